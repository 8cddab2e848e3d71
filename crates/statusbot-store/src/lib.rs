// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable state for statusbot.
//!
//! - [`CredentialStore`]: session key material, persisted on every rotation.
//! - [`MessageCache`]: recent messages, snapshotted on an interval.
//! - [`MediaVault`]: saved status media, one file per save.

pub mod atomic;
pub mod cache;
pub mod credentials;
pub mod vault;

pub use cache::MessageCache;
pub use credentials::CredentialStore;
pub use vault::MediaVault;
