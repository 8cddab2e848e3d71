// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session supervision and event handling for statusbot.
//!
//! - [`Supervisor`] keeps the transport session alive and routes events
//! - [`StatusPipeline`] marks statuses read and reacts to them, once each
//! - [`CommandEngine`] parses prefixed chat messages and runs commands
//! - [`RuntimeConfig`] holds the settings commands may change at runtime

pub mod commands;
pub mod settings;
pub mod shutdown;
pub mod status;
pub mod style;
pub mod supervisor;

pub use commands::{Command, CommandEngine, Invocation, NOT_AUTHORIZED};
pub use settings::{RuntimeConfig, RuntimeSettings};
pub use status::{StatusOutcome, StatusPipeline};
pub use style::UnicodeStyler;
pub use supervisor::{Backoff, Supervisor};
