//! # Brute-Force Views
//!
//! Failure counts grouped two ways: by source IP (who is hammering the
//! server) and by username (which accounts they want). Both views sort by
//! count descending and break ties by first appearance in the record.

use crate::AuthEvent;
use std::collections::HashMap;
use std::net::IpAddr;

/// Rank source IPs by failed-login count.
///
/// # Arguments
/// * `rows` - The full record in append order.
/// * `limit` - Maximum number of IPs to return.
///
/// # Returns
/// At most `limit` (ip, failure_count) pairs, count descending.
pub fn brute_force_top(rows: &[AuthEvent], limit: usize) -> Vec<(IpAddr, usize)> {
    let mut counts: HashMap<IpAddr, (usize, usize)> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        if !row.is_failure() {
            continue;
        }
        let entry = counts.entry(row.source_ip).or_insert((0, idx));
        entry.0 += 1;
    }

    let mut ranked: Vec<(IpAddr, usize, usize)> = counts
        .into_iter()
        .map(|(ip, (count, first_idx))| (ip, count, first_idx))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked.truncate(limit);
    ranked.into_iter().map(|(ip, count, _)| (ip, count)).collect()
}

/// Rank usernames by how often they appear in failed logins.
///
/// Rows without a username are excluded here. They still count in the
/// per-IP view; an attempt with an unparseable account name is an attempt
/// against the server, not against a specific account.
///
/// # Returns
/// All (username, failure_count) pairs, count descending.
pub fn targeted_usernames(rows: &[AuthEvent]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        if !row.is_failure() {
            continue;
        }
        let Some(username) = row.username.as_deref() else {
            continue;
        };
        let entry = counts.entry(username).or_insert((0, idx));
        entry.0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(user, (count, first_idx))| (user, count, first_idx))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .map(|(user, count, _)| (user.to_string(), count))
        .collect()
}
