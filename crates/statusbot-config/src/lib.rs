// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Statusbot settings: the `[bot]`, `[storage]` and `[transport]` tables.
//!
//! Values come from compiled defaults, up to three `statusbot.toml` files,
//! the flat variables older deployments set (`OWNER_NUMBER`, `PREFIX`, ...)
//! and `STATUSBOT_<SECTION>_<KEY>` variables, in that order. Loading fails
//! with every problem found at once, rendered through miette.
//!
//! ```no_run
//! let config = match statusbot_config::load_and_validate() {
//!     Ok(config) => config,
//!     Err(errors) => {
//!         statusbot_config::render_errors(&errors);
//!         std::process::exit(1);
//!     }
//! };
//! println!("answering {} for {}", config.bot.prefix, config.bot.owner);
//! ```

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod validation;

use std::path::Path;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::StatusBotConfig;

/// Load from the standard locations plus environment, then validate.
pub fn load_and_validate() -> Result<StatusBotConfig, Vec<ConfigError>> {
    checked(loader::load_config(), searched_files)
}

/// Load from `path` plus environment, then validate.
pub fn load_and_validate_path(path: &Path) -> Result<StatusBotConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_path(path), || read_sources([path]))
}

/// Load from a TOML string alone, then validate.
pub fn load_and_validate_str(toml_content: &str) -> Result<StatusBotConfig, Vec<ConfigError>> {
    checked(loader::load_config_from_str(toml_content), || {
        vec![("<inline>".to_string(), toml_content.to_string())]
    })
}

/// Runs validation on success. On failure, `sources` is read only then,
/// to place spans in the reports.
fn checked(
    loaded: Result<StatusBotConfig, figment::Error>,
    sources: impl FnOnce() -> Vec<(String, String)>,
) -> Result<StatusBotConfig, Vec<ConfigError>> {
    let config = loaded.map_err(|err| diagnostic::figment_to_config_errors(err, &sources()))?;
    validation::validate_config(&config)?;
    Ok(config)
}

fn searched_files() -> Vec<(String, String)> {
    read_sources(loader::search_paths())
}

/// Reads each existing file, keyed by the absolute path figment reports.
fn read_sources<P: AsRef<Path>>(paths: impl IntoIterator<Item = P>) -> Vec<(String, String)> {
    let cwd = std::env::current_dir().unwrap_or_default();
    paths
        .into_iter()
        .filter_map(|path| {
            let path = cwd.join(path.as_ref());
            let content = std::fs::read_to_string(&path).ok()?;
            Some((path.display().to_string(), content))
        })
        .collect()
}
