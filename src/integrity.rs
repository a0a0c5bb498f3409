//! Archive integrity checking against recorded SHA-256 digests.
//!
//! An archive directory holds log archives plus sha256sum-style sidecar
//! files naming their expected digests. Verification recomputes every
//! named target's digest with a fixed-size read buffer and reports one
//! outcome per target. A bad sidecar or an unreadable target gets its
//! own report row and never stops the remaining checks.

use crate::{SentryError, SentryResult};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const HASH_BUF_SIZE: usize = 4096;

/// Expected digest for one archive, parsed from a sidecar line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigestRecord {
    /// Hex digest as recorded.
    pub expected: String,

    /// Target filename, relative to the archive directory.
    pub filename: String,
}

/// Outcome for one verified target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Recomputed digest matches the recorded one.
    Ok,

    /// Content digest differs from the recorded one.
    Modified,

    /// The target file is gone.
    Missing,

    /// The target (or its sidecar) could not be read.
    Unreadable(String),
}

/// One row of the verification report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Target archive name, or the sidecar name when the sidecar itself
    /// was unreadable.
    pub target: String,

    pub outcome: CheckOutcome,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.outcome == CheckOutcome::Ok
    }
}

/// Parse one sha256sum-format line: `<hex>  <filename>`, with an optional
/// `*` binary-mode marker before the filename. Blank lines, `#` comments,
/// and lines without both fields yield None.
pub fn parse_digest_line(line: &str) -> Option<DigestRecord> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (hash, rest) = line.split_once(char::is_whitespace)?;
    let filename = rest.trim_start().trim_start_matches('*').trim();
    if filename.is_empty() {
        return None;
    }

    Some(DigestRecord {
        expected: hash.to_string(),
        filename: filename.to_string(),
    })
}

/// Streamed SHA-256 of a file's full content, hex-encoded.
///
/// Reads in fixed-size chunks; archives never load whole into memory.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; HASH_BUF_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Verify every archive named by the digest sidecars in `dir`.
///
/// Sidecars matching `pattern` are processed in filename order so the
/// report is stable across filesystems. A missing archive directory is
/// the one fatal case; everything below it is isolated per row.
pub fn verify_directory(dir: &Path, pattern: &str) -> SentryResult<Vec<CheckReport>> {
    if !dir.is_dir() {
        return Err(SentryError::Read(format!(
            "archive directory not found: {}",
            dir.display(),
        )));
    }

    let mut sidecars: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| matches_pattern(n, pattern))
        })
        .collect();
    sidecars.sort();

    if sidecars.is_empty() {
        log::info!(
            "[VERIFY] No digest files matching {} in {}",
            pattern,
            dir.display(),
        );
        return Ok(Vec::new());
    }

    let mut reports = Vec::new();
    for sidecar in &sidecars {
        let sidecar_name = sidecar
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let content = match std::fs::read_to_string(sidecar) {
            Ok(content) => content,
            Err(e) => {
                log::warn!("[VERIFY] Cannot read digest file {}: {}", sidecar.display(), e);
                reports.push(CheckReport {
                    target: sidecar_name,
                    outcome: CheckOutcome::Unreadable(e.to_string()),
                });
                continue;
            }
        };

        let records: Vec<DigestRecord> = content.lines().filter_map(parse_digest_line).collect();
        if records.is_empty() {
            log::warn!("[VERIFY] No usable entries in digest file {}", sidecar.display());
            continue;
        }

        for record in records {
            reports.push(check_record(dir, &record));
        }
    }
    Ok(reports)
}

/// Suffix-style sidecar matching. `*.sha256` matches any name ending in
/// `.sha256`; a pattern without the leading star must match exactly.
fn matches_pattern(name: &str, pattern: &str) -> bool {
    match pattern.strip_prefix('*') {
        Some(suffix) => name.ends_with(suffix),
        None => name == pattern,
    }
}

fn check_record(dir: &Path, record: &DigestRecord) -> CheckReport {
    let target_path = dir.join(&record.filename);

    let outcome = if !target_path.exists() {
        CheckOutcome::Missing
    } else {
        match sha256_file(&target_path) {
            // Recorded digests come from assorted tools; compare hex
            // case-insensitively.
            Ok(actual) if actual.eq_ignore_ascii_case(&record.expected) => CheckOutcome::Ok,
            Ok(_) => CheckOutcome::Modified,
            Err(e) => CheckOutcome::Unreadable(e.to_string()),
        }
    };

    CheckReport {
        target: record.filename.clone(),
        outcome,
    }
}
