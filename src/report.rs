//! Plain-text rendering of the report sections and verification lines.
//!
//! Every function here is a pure formatter over already-computed results.
//! The CLI decides what to compute and prints whatever comes back.

use crate::analysis::EnumerationHit;
use crate::integrity::{CheckOutcome, CheckReport};
use crate::AuthEvent;
use std::net::IpAddr;

const HISTOGRAM_WIDTH: usize = 40;

/// "=== Top Failed Login IPs ===" section.
pub fn render_brute_force(top: &[(IpAddr, usize)]) -> String {
    let mut out = String::from("=== Top Failed Login IPs ===\n");
    if top.is_empty() {
        out.push_str("none\n");
        return out;
    }
    for (ip, count) in top {
        out.push_str(&format!("{}: {}\n", ip, count));
    }
    out
}

/// "=== Users Targeted in Failures ===" section.
pub fn render_targeted_usernames(targeted: &[(String, usize)]) -> String {
    let mut out = String::from("=== Users Targeted in Failures ===\n");
    if targeted.is_empty() {
        out.push_str("none\n");
        return out;
    }
    for (user, count) in targeted {
        out.push_str(&format!("{}: {}\n", user, count));
    }
    out
}

/// "=== Events by Hour of Day ===" section, one row per hour with a
/// proportional bar.
pub fn render_hourly(buckets: &[usize; 24]) -> String {
    let mut out = String::from("=== Events by Hour of Day ===\n");
    let max = buckets.iter().copied().max().unwrap_or(0);
    if max == 0 {
        out.push_str("none\n");
        return out;
    }
    for (hour, count) in buckets.iter().enumerate() {
        let bar_len = count * HISTOGRAM_WIDTH / max;
        out.push_str(&format!(
            "{:02}:00  {:>6}  {}\n",
            hour,
            count,
            "#".repeat(bar_len),
        ));
    }
    out
}

/// "=== Username Enumeration ===" section.
pub fn render_enumeration(hits: &[EnumerationHit], threshold: usize) -> String {
    let mut out = format!(
        "=== Username Enumeration (>= {} distinct users) ===\n",
        threshold,
    );
    if hits.is_empty() {
        out.push_str("none\n");
        return out;
    }
    for hit in hits {
        out.push_str(&format!(
            "{}: {} usernames across {} failed attempts\n",
            hit.ip, hit.distinct_usernames, hit.attempts,
        ));
    }
    out
}

/// "=== Recent Successful Logins ===" section, raw lines verbatim.
pub fn render_recent_successes(successes: &[&AuthEvent]) -> String {
    let mut out = String::from("=== Recent Successful Logins ===\n");
    if successes.is_empty() {
        out.push_str("none\n");
        return out;
    }
    for event in successes {
        out.push_str(&format!("{}\n", event.raw_line));
    }
    out
}

/// One status line of the verification report, e.g.
/// `[MODIFIED]   auth.log.1.gz`.
pub fn render_check_line(report: &CheckReport) -> String {
    match &report.outcome {
        CheckOutcome::Ok => format!("{:<12} {}", "[OK]", report.target),
        CheckOutcome::Modified => format!("{:<12} {}", "[MODIFIED]", report.target),
        CheckOutcome::Missing => format!("{:<12} {}", "[MISSING]", report.target),
        CheckOutcome::Unreadable(e) => {
            format!("{:<12} {} ({})", "[UNREADABLE]", report.target, e)
        }
    }
}

/// Closing count line for a verification run.
pub fn render_check_summary(reports: &[CheckReport]) -> String {
    let mut ok = 0;
    let mut modified = 0;
    let mut missing = 0;
    let mut unreadable = 0;
    for report in reports {
        match report.outcome {
            CheckOutcome::Ok => ok += 1,
            CheckOutcome::Modified => modified += 1,
            CheckOutcome::Missing => missing += 1,
            CheckOutcome::Unreadable(_) => unreadable += 1,
        }
    }
    format!(
        "{} checked: {} ok, {} modified, {} missing, {} unreadable",
        reports.len(),
        ok,
        modified,
        missing,
        unreadable,
    )
}
