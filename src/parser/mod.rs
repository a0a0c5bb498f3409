//! Line-pattern extraction of authentication events.
//!
//! Copyright (c) 2026 CIPS Corps. All rights reserved.

pub mod sshd;

use crate::reader;
use crate::{AuthEvent, IngestSummary, SentryResult};
use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// One recognized log line shape.
///
/// An implementor attempts its single pattern against a raw line and
/// produces an event when the line matches. A miss is a normal outcome,
/// not an error; lines that match no pattern are simply skipped.
pub trait LinePattern {
    /// Short identifier used in debug logging.
    fn name(&self) -> &'static str;

    /// Attempt this pattern against one raw line.
    fn try_parse(&self, line: &str) -> Option<AuthEvent>;
}

/// An ordered set of line patterns. The first match wins.
pub struct PatternSet {
    patterns: Vec<Box<dyn LinePattern>>,
}

impl PatternSet {
    /// The standard sshd pattern set, most specific first.
    ///
    /// Failed-password runs before invalid-user so that
    /// "Failed password for invalid user ..." lines classify as failed
    /// passwords rather than bare invalid-user probes.
    pub fn standard() -> Self {
        let mut set = Self {
            patterns: Vec::new(),
        };
        set.register(Box::new(sshd::FailedPassword));
        set.register(Box::new(sshd::InvalidUser));
        set.register(Box::new(sshd::AcceptedLogin));
        set
    }

    pub fn register(&mut self, pattern: Box<dyn LinePattern>) {
        log::debug!("Registered line pattern: {}", pattern.name());
        self.patterns.push(pattern);
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Run the line through each pattern in order.
    pub fn apply(&self, line: &str) -> Option<AuthEvent> {
        self.patterns.iter().find_map(|p| p.try_parse(line))
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Read a log source (plain or gzip) and extract every recognized event.
///
/// Events come back in file order together with the run counters.
/// Unmatched lines are counted as skipped; an unreadable source or a
/// corrupt gzip stream aborts with the underlying error.
pub fn scan_file(path: &Path, set: &PatternSet) -> SentryResult<(Vec<AuthEvent>, IngestSummary)> {
    let mut events = Vec::new();
    let mut summary = IngestSummary::default();

    for line in reader::open_lines(path)? {
        let line = line?;
        summary.lines_read += 1;
        match set.apply(&line) {
            Some(event) => events.push(event),
            None => summary.lines_skipped += 1,
        }
    }
    summary.events_parsed = events.len() as u64;

    log::info!(
        "[SCAN] {}: {} lines, {} events, {} skipped",
        path.display(),
        summary.lines_read,
        summary.events_parsed,
        summary.lines_skipped,
    );
    Ok((events, summary))
}

// ---------------------------------------------------------------------------
// Syslog header handling
// ---------------------------------------------------------------------------

/// Classic BSD syslog header: "Mon DD HH:MM:SS hostname process[PID]:"
static RE_BSD_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([A-Z][a-z]{2})\s+(\d{1,2})\s+(\d{2}:\d{2}:\d{2})\s+(\S+)\s+(\S+?)(?:\[(\d+)\])?:\s+(.*)$",
    )
    .expect("regex")
});

/// RFC 3339 header emitted by modern rsyslog:
/// "2026-01-05T14:23:01.123456+00:00 hostname process[PID]:"
static RE_ISO_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:\d{2}))\s+(\S+)\s+(\S+?)(?:\[(\d+)\])?:\s+(.*)$",
    )
    .expect("regex")
});

/// Split a syslog line into (timestamp, process, message).
///
/// Accepts both header styles. Lines without a parseable header produce
/// no event at all; a partial record would be useless to every view.
pub(crate) fn split_header(line: &str) -> Option<(DateTime<Utc>, &str, &str)> {
    if let Some(caps) = RE_BSD_HEADER.captures(line) {
        let timestamp = parse_bsd_timestamp(
            caps.get(1)?.as_str(),
            caps.get(2)?.as_str(),
            caps.get(3)?.as_str(),
        )?;
        return Some((timestamp, caps.get(5)?.as_str(), caps.get(7)?.as_str()));
    }
    if let Some(caps) = RE_ISO_HEADER.captures(line) {
        let timestamp = DateTime::parse_from_rfc3339(caps.get(1)?.as_str())
            .ok()?
            .with_timezone(&Utc);
        return Some((timestamp, caps.get(3)?.as_str(), caps.get(5)?.as_str()));
    }
    None
}

/// BSD syslog timestamps carry no year; assume the current one.
fn parse_bsd_timestamp(month: &str, day: &str, time: &str) -> Option<DateTime<Utc>> {
    let month_num = match month {
        "Jan" => 1,
        "Feb" => 2,
        "Mar" => 3,
        "Apr" => 4,
        "May" => 5,
        "Jun" => 6,
        "Jul" => 7,
        "Aug" => 8,
        "Sep" => 9,
        "Oct" => 10,
        "Nov" => 11,
        "Dec" => 12,
        _ => return None,
    };
    let year = Utc::now().year();
    let day_num: u32 = day.trim().parse().ok()?;
    let parts: Vec<&str> = time.split(':').collect();
    if parts.len() != 3 {
        return None;
    }
    let hour: u32 = parts[0].parse().ok()?;
    let minute: u32 = parts[1].parse().ok()?;
    let second: u32 = parts[2].parse().ok()?;
    let naive = NaiveDateTime::new(
        chrono::NaiveDate::from_ymd_opt(year, month_num, day_num)?,
        chrono::NaiveTime::from_hms_opt(hour, minute, second)?,
    );
    Some(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;
    use chrono::Timelike;

    #[test]
    fn test_standard_set_has_three_patterns() {
        assert_eq!(PatternSet::standard().pattern_count(), 3);
    }

    #[test]
    fn test_split_header_bsd() {
        let line = "Jan  5 14:23:01 webserver sshd[12345]: Failed password for admin from 192.168.1.100 port 54321 ssh2";
        let (ts, process, message) = split_header(line).expect("should split");
        assert_eq!(ts.hour(), 14);
        assert_eq!(process, "sshd");
        assert!(message.starts_with("Failed password"));
    }

    #[test]
    fn test_split_header_iso() {
        let line = "2026-02-12T03:44:55.123456+00:00 prod sshd[9999]: Invalid user oracle from 10.0.0.5 port 22222";
        let (ts, process, message) = split_header(line).expect("should split");
        assert_eq!(ts.hour(), 3);
        assert_eq!(ts.year(), 2026);
        assert_eq!(process, "sshd");
        assert!(message.starts_with("Invalid user"));
    }

    #[test]
    fn test_split_header_rejects_garbage() {
        assert!(split_header("").is_none());
        assert!(split_header("not a syslog line").is_none());
        assert!(split_header("Xyz  5 14:23:01 host sshd[1]: msg").is_none());
    }

    #[test]
    fn test_apply_failed_before_invalid() {
        let set = PatternSet::standard();
        let line = "Feb 12 03:44:55 prod sshd[9999]: Failed password for invalid user oracle from 10.0.0.5 port 22222 ssh2";
        let event = set.apply(line).expect("should parse");
        assert_eq!(event.kind, EventKind::AuthFailure);
    }

    #[test]
    fn test_apply_unmatched_returns_none() {
        let set = PatternSet::standard();
        assert!(set.apply("Nov  1 12:00:00 server kernel: [12345.678] eth0: link up").is_none());
        assert!(set.apply("").is_none());
    }

    #[test]
    fn test_scan_file_counts() {
        let dir = std::env::temp_dir().join("logsentry_test_scan_counts");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("auth.log");
        std::fs::write(
            &path,
            "Jan  5 14:23:01 web sshd[1]: Failed password for admin from 192.168.1.100 port 54321 ssh2\n\
             Jan  5 14:23:02 web kernel: eth0 link up\n\
             Jan  5 14:23:03 web sshd[1]: Accepted password for deploy from 172.16.0.50 port 60000 ssh2\n",
        )
        .unwrap();

        let (events, summary) = scan_file(&path, &PatternSet::standard()).expect("should scan");
        assert_eq!(summary.lines_read, 3);
        assert_eq!(summary.events_parsed, 2);
        assert_eq!(summary.lines_skipped, 1);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::AuthFailure);
        assert_eq!(events[1].kind, EventKind::AuthSuccess);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_scan_file_missing_path_errors() {
        let result = scan_file(
            Path::new("/nonexistent/logsentry/auth.log"),
            &PatternSet::standard(),
        );
        assert!(result.is_err());
    }
}
