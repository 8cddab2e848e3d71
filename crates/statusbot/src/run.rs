// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `statusbot run` command implementation.
//!
//! Opens the stores, wires the status pipeline and command engine to a
//! bridge-backed supervisor, and runs until a signal or a fatal error.

use std::sync::Arc;
use std::time::Duration;

use statusbot_agent::{
    CommandEngine, RuntimeConfig, StatusPipeline, Supervisor, UnicodeStyler, shutdown,
};
use statusbot_bridge::{BridgeConnector, TerminalPresenter};
use statusbot_config::StatusBotConfig;
use statusbot_core::{StatusBotError, TextStyler};
use statusbot_store::{CredentialStore, MediaVault, MessageCache};
use tracing::{error, info};

/// Command handlers may download, store, and re-send media in one go.
const HANDLER_TIMEOUT_FACTOR: u32 = 4;

/// Upper bound on the final cache flush at shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the bot until SIGINT/SIGTERM (`Ok`) or a fatal error.
pub async fn run(config: StatusBotConfig) -> Result<(), StatusBotError> {
    let settings = Arc::new(RuntimeConfig::from_config(&config)?);
    let vault = Arc::new(MediaVault::open(config.storage.status_dir())?);
    let credentials = CredentialStore::open(config.storage.session_dir.clone())?;
    let cache = Arc::new(MessageCache::from_config(&config.storage).await);
    info!(
        vault = %vault.dir().display(),
        session = %credentials.dir().display(),
        cached = cache.len().await,
        "stores opened"
    );

    let styler: Arc<dyn TextStyler> = Arc::new(UnicodeStyler);
    let status = Arc::new(StatusPipeline::new(
        settings.clone(),
        config.transport.dedup_capacity,
    ));
    let commands = Arc::new(CommandEngine::new(
        settings,
        vault,
        cache.clone(),
        styler.clone(),
        config.transport.request_timeout() * HANDLER_TIMEOUT_FACTOR,
    ));
    let supervisor = Supervisor::new(
        Arc::new(BridgeConnector::from_config(&config.transport)),
        credentials,
        Arc::new(TerminalPresenter),
        styler,
        cache.clone(),
        status,
        commands,
        &config.transport,
    );

    let cancel = shutdown::install_signal_handler();
    let flush = cache
        .clone()
        .spawn_flush_task(config.storage.cache_flush_interval(), cancel.clone());

    info!(
        bot = %config.bot.name,
        bridge = %config.transport.bridge_url,
        "statusbot starting"
    );
    let result = supervisor.run(cancel.clone()).await;
    if let Err(e) = &result {
        error!(error = %e, "supervisor stopped on fatal error");
    }

    // Also stops the flush task after a fatal error; it flushes once more on the way out.
    cancel.cancel();
    shutdown::drain_tasks(vec![("cache-flush", flush)], DRAIN_TIMEOUT).await;
    log_memory_usage();

    info!("statusbot shutdown complete");
    result
}

#[cfg(not(target_env = "msvc"))]
fn log_memory_usage() {
    let _ = tikv_jemalloc_ctl::epoch::advance();
    let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
    let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
    tracing::debug!(
        allocated_kb = allocated / 1024,
        resident_kb = resident / 1024,
        "heap usage at shutdown"
    );
}

#[cfg(target_env = "msvc")]
fn log_memory_usage() {}
