// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Statusbot - views, reacts to, and saves contact status updates.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use statusbot_config::{ConfigError, StatusBotConfig};

/// Statusbot - views, reacts to, and saves contact status updates.
#[derive(Parser, Debug)]
#[command(name = "statusbot", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this TOML file instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Connect to the bridge and run until interrupted (the default).
    Run,
    /// Validate the configuration and print a summary.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<StatusBotConfig, Vec<ConfigError>> {
    match path {
        Some(path) => statusbot_config::load_and_validate_path(path),
        None => statusbot_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            statusbot_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            init_tracing(&config.bot.log_level);
            if let Err(e) = run::run(config).await {
                eprintln!("statusbot: {e}");
                std::process::exit(if e.is_fatal() { 2 } else { 1 });
            }
        }
        Commands::CheckConfig => print_summary(&config),
    }
}

fn print_summary(config: &StatusBotConfig) {
    println!("statusbot: config OK");
    println!("  bot:       {} (owner {})", config.bot.name, config.bot.owner);
    println!("  prefix:    {}", config.bot.prefix);
    println!("  timezone:  {}", config.bot.timezone);
    println!("  font:      {}", config.bot.default_font);
    println!("  vault:     {}", config.storage.status_dir().display());
    println!("  session:   {}", config.storage.session_dir.display());
    println!("  bridge:    {}", config.transport.bridge_url);
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("statusbot={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
