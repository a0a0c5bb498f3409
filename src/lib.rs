//! # logsentry - Core Library
//!
//! After-the-fact authentication log review and archive integrity checking
//! for small servers.
//!
//! logsentry reads auth logs (plain text or gzip-compressed), extracts
//! failed and successful login events into a cumulative on-disk record, and
//! answers a small fixed set of questions about it: which IPs are
//! brute-forcing, which accounts they target, what hours they work, and who
//! is enumerating usernames. A separate checker verifies archived logs
//! against recorded SHA-256 digests.
//!
//! ## Design Philosophy
//! - **Review, not response.** The tool reports and exits. It never blocks
//!   an IP or calls out to anything.
//! - **Plain files.** An append-only NDJSON record, a TOML config, and
//!   sha256sum-style digest sidecars. Nothing that needs a server.
//! - The record only grows. Re-running ingestion on the same log adds the
//!   same rows again; the record is a cumulative history, not a set.

pub mod reader;
pub mod parser;
pub mod store;
pub mod analysis;
pub mod report;
pub mod integrity;

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Unified error type for logsentry.
#[derive(Error, Debug)]
pub enum SentryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Source read error: {0}")]
    Read(String),

    #[error("Decompression error: {0}")]
    Decompress(String),

    #[error("Event store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type SentryResult<T> = Result<T, SentryError>;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Top-level configuration for logsentry.
///
/// Loaded from `logsentry.toml` in the working directory or a path supplied
/// via CLI flag. Every field has a default, so the tool runs without a
/// config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentryConfig {
    /// General paths.
    pub general: GeneralConfig,

    /// Report tuning knobs.
    pub analysis: AnalysisConfig,

    /// Archive integrity checking settings.
    pub integrity: IntegrityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Directory where logsentry keeps its state.
    pub data_dir: PathBuf,

    /// Path to the append-only event record.
    pub store_file: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Maximum rows in the brute-force attacker table.
    pub top_n: usize,

    /// Minimum distinct usernames from one IP before it counts as
    /// username enumeration.
    pub enumeration_threshold: usize,

    /// How many of the latest successful logins the report lists.
    pub recent_successes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrityConfig {
    /// Directory holding archived logs and their digest sidecars.
    pub archive_dir: PathBuf,

    /// Filename pattern that identifies digest sidecar files.
    pub digest_pattern: String,
}

impl Default for SentryConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig {
                data_dir: PathBuf::from("./logsentry-data"),
                store_file: PathBuf::from("./logsentry-data/events.ndjson"),
            },
            analysis: AnalysisConfig {
                top_n: 10,
                enumeration_threshold: 3,
                recent_successes: 10,
            },
            integrity: IntegrityConfig {
                archive_dir: PathBuf::from("./archives"),
                digest_pattern: "*.sha256".to_string(),
            },
        }
    }
}

impl SentryConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> SentryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: SentryConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Write the default configuration to a TOML file.
    pub fn write_default(path: &std::path::Path) -> SentryResult<()> {
        let config = Self::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| SentryError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Core Types
// ---------------------------------------------------------------------------

/// A single authentication event parsed from a log line.
///
/// This is the atomic unit of observation. Line patterns produce these,
/// the store persists them verbatim, and the analysis views consume them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    /// When this event occurred.
    pub timestamp: DateTime<Utc>,

    /// What kind of event this is.
    pub kind: EventKind,

    /// Source IP address of the client.
    pub source_ip: IpAddr,

    /// Username the client presented, when the line carries one.
    pub username: Option<String>,

    /// Raw log line for forensic reference.
    pub raw_line: String,
}

impl AuthEvent {
    /// Hour-of-day bucket (0-23) this event falls into.
    pub fn hour(&self) -> u32 {
        self.timestamp.hour()
    }

    /// Whether this event represents a failed authentication.
    pub fn is_failure(&self) -> bool {
        self.kind.is_failure()
    }
}

/// Classification of authentication events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Failed password or key authentication for a known account.
    AuthFailure,

    /// Authentication attempt against a nonexistent account.
    InvalidUser,

    /// Successful authentication (worth reviewing after a brute-force run).
    AuthSuccess,
}

impl EventKind {
    /// Failed-login semantics. Invalid-user attempts are failures too:
    /// the account check just rejected them one step earlier.
    pub fn is_failure(&self) -> bool {
        matches!(self, EventKind::AuthFailure | EventKind::InvalidUser)
    }
}

/// Counters for one ingestion run.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestSummary {
    /// Lines read from the source, matched or not.
    pub lines_read: u64,

    /// Events extracted from matched lines.
    pub events_parsed: u64,

    /// Lines that matched no pattern or failed validation.
    pub lines_skipped: u64,
}
