//! # Analysis Views
//!
//! The fixed set of questions the tool answers about the event record.
//! Each view is a pure function over the loaded rows, recomputed in full
//! on every run. Row order is append order, and every view breaks count
//! ties by it, so identical records always produce identical output.
//!
//! "Failure" here means failed-password and invalid-user rows both; an
//! attempt against a nonexistent account is still a failed login.

pub mod brute_force;
pub mod enumeration;
pub mod temporal;

pub use brute_force::{brute_force_top, targeted_usernames};
pub use enumeration::username_enumeration;
pub use temporal::hourly_distribution;

use crate::AuthEvent;
use std::net::IpAddr;

/// One IP flagged by the username-enumeration view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationHit {
    /// The probing source.
    pub ip: IpAddr,

    /// How many different usernames it tried.
    pub distinct_usernames: usize,

    /// Total failed attempts from this IP, named or not.
    pub attempts: usize,
}

/// The latest successful logins, oldest first, at most `limit` of them.
///
/// A login that follows a long failure streak is the row an operator
/// actually wants to see, so the report ends with these.
pub fn recent_successes(rows: &[AuthEvent], limit: usize) -> Vec<&AuthEvent> {
    let successes: Vec<&AuthEvent> = rows
        .iter()
        .filter(|r| r.kind == crate::EventKind::AuthSuccess)
        .collect();
    let start = successes.len().saturating_sub(limit);
    successes[start..].to_vec()
}
