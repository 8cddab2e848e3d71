// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media vault: one file per saved status, named `status_<unix-millis><ext>`.
//!
//! The directory listing is the vault's only state. All operations take the
//! same lock, so a save never interleaves with a clear's delete pass.

use std::path::{Path, PathBuf};

use statusbot_core::StatusBotError;
use statusbot_core::types::MediaKind;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::atomic;

const FILE_PREFIX: &str = "status_";

/// Attempts at finding a free name before giving up on a save.
const MAX_NAME_ATTEMPTS: u32 = 32;

/// Timestamp-named media storage.
#[derive(Debug)]
pub struct MediaVault {
    dir: PathBuf,
    /// Millisecond stamp of the last issued file name.
    last_stamp: Mutex<i64>,
}

impl MediaVault {
    /// Opens the vault, creating its directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StatusBotError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            StatusBotError::persistence(format!("failed to create {}", dir.display()), e)
        })?;
        Ok(Self {
            dir,
            last_stamp: Mutex::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stores `bytes` under a fresh name and returns that name.
    ///
    /// The stamp is the current time in milliseconds, bumped past the last
    /// issued stamp so two saves in the same millisecond get distinct names.
    /// Existing files are never overwritten.
    pub async fn save(&self, bytes: &[u8], kind: MediaKind) -> Result<String, StatusBotError> {
        let mut last = self.last_stamp.lock().await;
        let mut stamp = chrono::Utc::now().timestamp_millis().max(*last + 1);

        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = file_name(stamp, kind);
            let path = self.dir.join(&name);
            let content = bytes.to_vec();

            let written = tokio::task::spawn_blocking(move || atomic::write_new(&path, &content))
                .await
                .map_err(|e| StatusBotError::Internal(format!("media write task failed: {e}")))?;

            match written {
                Ok(_) => {
                    *last = stamp;
                    debug!(file = %name, bytes = bytes.len(), "status media saved");
                    return Ok(name);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    stamp += 1;
                }
                Err(e) => {
                    return Err(StatusBotError::persistence(
                        format!("failed to save {name}"),
                        e,
                    ));
                }
            }
        }

        Err(StatusBotError::Persistence {
            message: "no free media file name".into(),
            source: None,
        })
    }

    /// File names of saved media in directory enumeration order.
    pub async fn list(&self) -> Result<Vec<String>, StatusBotError> {
        let _guard = self.last_stamp.lock().await;
        self.list_unlocked().await
    }

    /// Deletes every listed file and returns how many were listed.
    ///
    /// A failed delete is logged and the pass continues; the file still
    /// counts toward the total, so the number reported is the number of
    /// entries the pass covered.
    pub async fn clear(&self) -> Result<usize, StatusBotError> {
        let _guard = self.last_stamp.lock().await;
        let names = self.list_unlocked().await?;

        for name in &names {
            if let Err(e) = tokio::fs::remove_file(self.dir.join(name)).await {
                warn!(file = %name, error = %e, "failed to delete saved status");
            }
        }

        info!(count = names.len(), "media vault cleared");
        Ok(names.len())
    }

    /// Number of saved media files.
    pub async fn count(&self) -> Result<usize, StatusBotError> {
        Ok(self.list().await?.len())
    }

    /// Reads a saved file back.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>, StatusBotError> {
        let path = self.dir.join(name);
        tokio::fs::read(&path)
            .await
            .map_err(|e| StatusBotError::persistence(format!("failed to read {name}"), e))
    }

    async fn list_unlocked(&self) -> Result<Vec<String>, StatusBotError> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StatusBotError::persistence(
                    format!("failed to list {}", self.dir.display()),
                    e,
                ));
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            StatusBotError::persistence(format!("failed to list {}", self.dir.display()), e)
        })? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if MediaKind::from_file_name(&name).is_some() {
                names.push(name);
            }
        }
        Ok(names)
    }
}

fn file_name(stamp: i64, kind: MediaKind) -> String {
    format!("{FILE_PREFIX}{stamp}{}", kind.extension())
}
