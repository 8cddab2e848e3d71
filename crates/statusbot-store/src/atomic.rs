// SPDX-FileCopyrightText: 2026 Statusbot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Write-to-temp-then-rename helpers.
//!
//! Readers never observe a partially written file: the content is fully
//! written and synced in a sibling temp file before it takes the final name.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Atomically replaces `path` with `content`.
pub fn write_replace(path: &Path, content: &[u8]) -> io::Result<()> {
    let temp = write_temp(parent_of(path)?, content)?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Atomically creates `path` with `content`, failing with
/// [`io::ErrorKind::AlreadyExists`] instead of overwriting.
pub fn write_new(path: &Path, content: &[u8]) -> io::Result<PathBuf> {
    let temp = write_temp(parent_of(path)?, content)?;
    temp.persist_noclobber(path).map_err(|e| e.error)?;
    Ok(path.to_path_buf())
}

fn parent_of(path: &Path) -> io::Result<&Path> {
    if path.as_os_str().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "destination path cannot be empty",
        ));
    }
    let parent = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;
    Ok(parent)
}

fn write_temp(dir: &Path, content: &[u8]) -> io::Result<NamedTempFile> {
    let mut temp = tempfile::Builder::new()
        .prefix(".statusbot-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    Ok(temp)
}
