// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable session credentials.
//!
//! Credentials live in `<session_dir>/creds.json`. Every rotation is written
//! and fsynced before [`CredentialStore::persist`] returns, so the copy on
//! disk is never older than the one the transport is using.

use std::path::{Path, PathBuf};

use statusbot_core::StatusBotError;
use statusbot_core::types::SessionCredentials;
use tracing::{debug, info};

use crate::atomic;

const CREDENTIALS_FILE: &str = "creds.json";

/// File-backed store for one session's credentials.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    /// Opens (and creates if needed) the session directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StatusBotError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| StatusBotError::CredentialPersistence {
            source: Box::new(e),
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE)
    }

    /// Reads the stored credentials. `None` means the session must be paired.
    pub async fn load(&self) -> Result<Option<SessionCredentials>, StatusBotError> {
        let path = self.path();
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no stored credentials, pairing required");
                return Ok(None);
            }
            Err(e) => {
                return Err(StatusBotError::persistence(
                    format!("failed to read {}", path.display()),
                    e,
                ));
            }
        };

        let credentials: SessionCredentials =
            serde_json::from_slice(&bytes).map_err(|e| StatusBotError::Persistence {
                message: format!("corrupt credentials file {}", path.display()),
                source: Some(Box::new(e)),
            })?;

        debug!(registered = credentials.registered, "loaded stored credentials");
        Ok(Some(credentials))
    }

    /// Writes `credentials` durably, replacing the previous copy.
    ///
    /// Failure is reported as [`StatusBotError::CredentialPersistence`],
    /// which is fatal for the run.
    pub async fn persist(&self, credentials: &SessionCredentials) -> Result<(), StatusBotError> {
        let bytes = serde_json::to_vec_pretty(credentials)
            .map_err(|e| StatusBotError::CredentialPersistence { source: Box::new(e) })?;
        let path = self.path();

        tokio::task::spawn_blocking(move || atomic::write_replace(&path, &bytes))
            .await
            .map_err(|e| StatusBotError::CredentialPersistence { source: Box::new(e) })?
            .map_err(|e| StatusBotError::CredentialPersistence { source: Box::new(e) })?;

        debug!(registered = credentials.registered, "credentials persisted");
        Ok(())
    }
}
