//! sshd message patterns for `/var/log/auth.log` (and `/var/log/secure`
//! on RHEL).
//!
//! One implementor per message shape. String containment gates the regex
//! work, so a try_parse call on an unrelated line costs almost nothing.
//!
//! Copyright (c) 2026 CIPS Corps. All rights reserved.

use super::{split_header, LinePattern};
use crate::{AuthEvent, EventKind};
use regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;

// ---------------------------------------------------------------------------
// Compiled regexes (compiled once, used forever)
// ---------------------------------------------------------------------------

/// "Failed password for <user> from <ip> port <port> ssh2"
/// The user may carry an "invalid user" prefix.
static RE_FAILED_PASSWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Failed password for (?:invalid user )?(\S+) from (\d+\.\d+\.\d+\.\d+)")
        .expect("regex")
});

/// Failed-password lines without a usable "for <user>" clause. Some sshd
/// builds log these for empty or whitespace usernames; the attempt still
/// counts against the IP.
static RE_FAILED_NO_USER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Failed password.*? from (\d+\.\d+\.\d+\.\d+)").expect("regex")
});

/// "Invalid user <user> from <ip> port <port>"
static RE_INVALID_USER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Invalid user (\S+) from (\d+\.\d+\.\d+\.\d+)").expect("regex")
});

/// "Accepted password for <user> from <ip> port <port> ssh2"
/// Also "Accepted publickey for ..."
static RE_ACCEPTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Accepted (?:password|publickey) for (\S+) from (\d+\.\d+\.\d+\.\d+)")
        .expect("regex")
});

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// Failed password attempts, with or without a recognizable username.
pub struct FailedPassword;

impl LinePattern for FailedPassword {
    fn name(&self) -> &'static str {
        "failed-password"
    }

    fn try_parse(&self, line: &str) -> Option<AuthEvent> {
        if !line.contains("Failed password") {
            return None;
        }
        let (timestamp, _process, message) = split_header(line)?;

        if let Some(caps) = RE_FAILED_PASSWORD.captures(message) {
            let username = caps.get(1)?.as_str().to_string();
            let source_ip: IpAddr = caps.get(2)?.as_str().parse().ok()?;
            return Some(AuthEvent {
                timestamp,
                kind: EventKind::AuthFailure,
                source_ip,
                username: Some(username),
                raw_line: line.to_string(),
            });
        }

        let caps = RE_FAILED_NO_USER.captures(message)?;
        let source_ip: IpAddr = caps.get(1)?.as_str().parse().ok()?;
        Some(AuthEvent {
            timestamp,
            kind: EventKind::AuthFailure,
            source_ip,
            username: None,
            raw_line: line.to_string(),
        })
    }
}

/// Attempts against accounts that do not exist. A spread of these from
/// one IP is the signature of username enumeration.
pub struct InvalidUser;

impl LinePattern for InvalidUser {
    fn name(&self) -> &'static str {
        "invalid-user"
    }

    fn try_parse(&self, line: &str) -> Option<AuthEvent> {
        if !line.contains("Invalid user") {
            return None;
        }
        let (timestamp, _process, message) = split_header(line)?;
        let caps = RE_INVALID_USER.captures(message)?;
        let username = caps.get(1)?.as_str().to_string();
        let source_ip: IpAddr = caps.get(2)?.as_str().parse().ok()?;
        Some(AuthEvent {
            timestamp,
            kind: EventKind::InvalidUser,
            source_ip,
            username: Some(username),
            raw_line: line.to_string(),
        })
    }
}

/// Successful password or publickey logins.
pub struct AcceptedLogin;

impl LinePattern for AcceptedLogin {
    fn name(&self) -> &'static str {
        "accepted-login"
    }

    fn try_parse(&self, line: &str) -> Option<AuthEvent> {
        if !line.contains("Accepted password") && !line.contains("Accepted publickey") {
            return None;
        }
        let (timestamp, _process, message) = split_header(line)?;
        let caps = RE_ACCEPTED.captures(message)?;
        let username = caps.get(1)?.as_str().to_string();
        let source_ip: IpAddr = caps.get(2)?.as_str().parse().ok()?;
        Some(AuthEvent {
            timestamp,
            kind: EventKind::AuthSuccess,
            source_ip,
            username: Some(username),
            raw_line: line.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
