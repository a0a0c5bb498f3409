//! # Username Enumeration View
//!
//! An IP that fails against many different accounts is walking a username
//! list, not mistyping a password. This view flags every IP whose failed
//! attempts span at least `threshold` distinct usernames.

use super::EnumerationHit;
use crate::AuthEvent;
use std::collections::{HashMap, HashSet};
use std::net::IpAddr;

struct IpTally {
    usernames: HashSet<String>,
    attempts: usize,
    first_idx: usize,
}

/// Flag IPs whose failures span at least `threshold` distinct usernames.
///
/// Unnamed failures add to an IP's attempt count but not to its username
/// spread. Results sort by distinct-username count descending, then total
/// attempts descending, then first appearance in the record.
pub fn username_enumeration(rows: &[AuthEvent], threshold: usize) -> Vec<EnumerationHit> {
    let mut tallies: HashMap<IpAddr, IpTally> = HashMap::new();
    for (idx, row) in rows.iter().enumerate() {
        if !row.is_failure() {
            continue;
        }
        let tally = tallies.entry(row.source_ip).or_insert_with(|| IpTally {
            usernames: HashSet::new(),
            attempts: 0,
            first_idx: idx,
        });
        tally.attempts += 1;
        if let Some(username) = &row.username {
            tally.usernames.insert(username.clone());
        }
    }

    let mut hits: Vec<(EnumerationHit, usize)> = tallies
        .into_iter()
        .filter(|(_, tally)| tally.usernames.len() >= threshold)
        .map(|(ip, tally)| {
            (
                EnumerationHit {
                    ip,
                    distinct_usernames: tally.usernames.len(),
                    attempts: tally.attempts,
                },
                tally.first_idx,
            )
        })
        .collect();
    hits.sort_by(|a, b| {
        b.0.distinct_usernames
            .cmp(&a.0.distinct_usernames)
            .then(b.0.attempts.cmp(&a.0.attempts))
            .then(a.1.cmp(&b.1))
    });
    hits.into_iter().map(|(hit, _)| hit).collect()
}
