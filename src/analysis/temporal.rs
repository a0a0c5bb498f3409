//! # Hourly Distribution View
//!
//! Buckets every row of the record, successes included, by hour of day.
//! Attack traffic clusters at hours the legitimate users sleep through,
//! which makes this the quickest anomaly check in the report.

use crate::AuthEvent;

/// Count all rows per hour of day.
///
/// # Returns
/// 24 buckets indexed by hour, zeros included, so rendering never has to
/// special-case a quiet hour.
pub fn hourly_distribution(rows: &[AuthEvent]) -> [usize; 24] {
    let mut buckets = [0usize; 24];
    for row in rows {
        buckets[row.hour() as usize] += 1;
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventKind;
    use chrono::{TimeZone, Utc};

    fn event_at_hour(hour: u32, kind: EventKind) -> AuthEvent {
        AuthEvent {
            timestamp: Utc.with_ymd_and_hms(2026, 1, 5, hour, 30, 0).unwrap(),
            kind,
            source_ip: "1.2.3.4".parse().unwrap(),
            username: Some("root".to_string()),
            raw_line: String::new(),
        }
    }

    #[test]
    fn test_empty_record_is_all_zeros() {
        let buckets = hourly_distribution(&[]);
        assert_eq!(buckets.len(), 24);
        assert!(buckets.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_rows_land_in_their_hour() {
        let rows = vec![
            event_at_hour(2, EventKind::AuthFailure),
            event_at_hour(2, EventKind::AuthFailure),
            event_at_hour(14, EventKind::AuthFailure),
        ];
        let buckets = hourly_distribution(&rows);
        assert_eq!(buckets[2], 2);
        assert_eq!(buckets[14], 1);
        assert_eq!(buckets[3], 0);
    }

    #[test]
    fn test_every_kind_is_bucketed() {
        let rows = vec![
            event_at_hour(8, EventKind::AuthFailure),
            event_at_hour(8, EventKind::InvalidUser),
            event_at_hour(8, EventKind::AuthSuccess),
        ];
        assert_eq!(hourly_distribution(&rows)[8], 3);
    }

    #[test]
    fn test_midnight_and_last_hour_edges() {
        let rows = vec![
            event_at_hour(0, EventKind::AuthFailure),
            event_at_hour(23, EventKind::AuthFailure),
        ];
        let buckets = hourly_distribution(&rows);
        assert_eq!(buckets[0], 1);
        assert_eq!(buckets[23], 1);
    }
}
