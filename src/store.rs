//! Append-only NDJSON event record.
//!
//! One JSON object per line. The record accumulates across runs: nothing
//! deduplicates, rewrites, or deletes rows. Ingesting the same log twice
//! therefore doubles its rows, and the views report accordingly.

use crate::{AuthEvent, SentryError, SentryResult};
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Handle to the on-disk event record at an explicit path.
///
/// Loading returns rows in append order, which is also the order the
/// views use to break ties.
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    /// A store handle for `path`. The file is created on first append;
    /// a missing file loads as an empty record.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a batch of events, one JSON line each.
    ///
    /// Creates parent directories as needed. An empty batch touches
    /// nothing.
    pub fn append(&self, events: &[AuthEvent]) -> SentryResult<()> {
        if events.is_empty() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                SentryError::Store(format!("cannot open {}: {}", self.path.display(), e))
            })?;

        for event in events {
            let json_line = serde_json::to_string(event)?;
            writeln!(file, "{}", json_line)?;
        }
        file.flush()?;

        log::info!(
            "[STORE] Appended {} rows to {}",
            events.len(),
            self.path.display(),
        );
        Ok(())
    }

    /// Load the full record in append order.
    ///
    /// A corrupt row is skipped with a warning. One bad line must not
    /// take down every view of an otherwise healthy record.
    pub fn load(&self) -> SentryResult<Vec<AuthEvent>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = std::fs::File::open(&self.path).map_err(|e| {
            SentryError::Store(format!("cannot open {}: {}", self.path.display(), e))
        })?;
        let reader = BufReader::new(file);

        let mut events = Vec::new();
        for (lineno, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<AuthEvent>(&line) {
                Ok(event) => events.push(event),
                Err(e) => {
                    log::warn!(
                        "[STORE] Skipping corrupt row {}:{}: {}",
                        self.path.display(),
                        lineno + 1,
                        e,
                    );
                }
            }
        }
        Ok(events)
    }
}
