// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Graceful shutdown coordination with signal handling.
//!
//! SIGTERM and SIGINT (Ctrl+C) cancel a [`CancellationToken`] that the
//! supervisor and the cache flush task watch. Background tasks then get a
//! bounded amount of time to finish before the process exits.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), shutting down");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, shutting down");
                }
                _ = token_clone.cancelled() => {
                    debug!("shutdown requested internally");
                    return;
                }
            }
        }

        #[cfg(not(unix))]
        {
            tokio::select! {
                _ = ctrl_c => info!("received Ctrl+C, shutting down"),
                _ = token_clone.cancelled() => return,
            }
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

/// Waits up to `timeout` for each named background task to finish.
///
/// Tasks still running when the deadline passes are aborted.
pub async fn drain_tasks(tasks: Vec<(&'static str, JoinHandle<()>)>, timeout: Duration) {
    if tasks.is_empty() {
        return;
    }
    let deadline = tokio::time::Instant::now() + timeout;

    for (name, mut task) in tasks {
        match tokio::time::timeout_at(deadline, &mut task).await {
            Ok(Ok(())) => debug!(task = name, "background task finished"),
            Ok(Err(e)) => warn!(task = name, error = %e, "background task failed"),
            Err(_) => {
                warn!(task = name, "background task did not finish in time, aborting");
                task.abort();
            }
        }
    }
}
