//! Client-side log filter.
//!
//! Case-insensitive substring match over level, service and message. The
//! filter never mutates its input and an empty term keeps everything in order.

use crate::models::LogEntry;

/// `needle` doit déjà être en minuscules
pub fn matches(entry: &LogEntry, needle: &str) -> bool {
    entry.level.as_str().to_lowercase().contains(needle)
        || entry.service.to_lowercase().contains(needle)
        || entry.message.to_lowercase().contains(needle)
}

pub fn filter_logs<'a>(logs: &'a [LogEntry], term: &str) -> Vec<&'a LogEntry> {
    if term.is_empty() {
        return logs.iter().collect();
    }
    let needle = term.to_lowercase();
    logs.iter().filter(|entry| matches(entry, &needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::mock_logs;
    use chrono::{TimeZone, Utc};

    fn logs() -> Vec<LogEntry> {
        mock_logs(50, Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_empty_filter_keeps_order() {
        let logs = logs();
        let all = filter_logs(&logs, "");
        assert_eq!(all.len(), 50);
        assert!(all.iter().zip(logs.iter()).all(|(a, b)| a.id == b.id));
    }

    #[test]
    fn test_error_filter_hits_every_fifth_entry() {
        let logs = logs();
        let ids: Vec<&str> = filter_logs(&logs, "error").iter().map(|l| l.id.as_str()).collect();
        let expected: Vec<String> = (0..50).step_by(5).map(|i| (i + 1).to_string()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_case_insensitive_and_subset() {
        let logs = logs();
        let upper = filter_logs(&logs, "SERVICE_3");
        let lower = filter_logs(&logs, "service_3");
        assert_eq!(upper.len(), 10);
        assert_eq!(upper.len(), lower.len());
        assert!(upper.iter().all(|hit| logs.iter().any(|l| std::ptr::eq(l, *hit))));
        // pas de mutation de l'entrée
        assert_eq!(logs.len(), 50);
    }

    #[test]
    fn test_matches_takes_lowercased_needle() {
        let logs = logs();
        assert!(matches(&logs[0], "error"));
        assert!(!matches(&logs[0], "ERROR"));
        assert_eq!(filter_logs(&logs, "ErRoR").len(), 10);
    }

    #[test]
    fn test_no_match() {
        let logs = logs();
        assert!(filter_logs(&logs, "kernel panic").is_empty());
    }
}
