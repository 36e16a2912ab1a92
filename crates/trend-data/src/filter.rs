//! Splitting records around the start of a [`TimeWindow`].

use trend_core::models::ContactRecord;
use trend_core::time_utils::TimeWindow;

/// Records on either side of `window.start_date`, each in input order.
#[derive(Debug, Clone, Default)]
pub struct WindowSplit<'a> {
    /// `connected_on < start_date`; seeds the running count.
    pub before: Vec<&'a ContactRecord>,
    /// `connected_on >= start_date`. No upper bound is applied.
    pub within: Vec<&'a ContactRecord>,
}

/// Records dated on or after the window start.
pub fn within_window<'a>(records: &'a [ContactRecord], window: &TimeWindow) -> Vec<&'a ContactRecord> {
    records
        .iter()
        .filter(|r| window.contains(r.connected_on))
        .collect()
}

/// Records dated strictly before the window start.
pub fn before_window<'a>(records: &'a [ContactRecord], window: &TimeWindow) -> Vec<&'a ContactRecord> {
    records
        .iter()
        .filter(|r| window.precedes(r.connected_on))
        .collect()
}

/// Both halves in a single pass.
pub fn split_by_window<'a>(records: &'a [ContactRecord], window: &TimeWindow) -> WindowSplit<'a> {
    let (within, before): (Vec<_>, Vec<_>) = records
        .iter()
        .partition(|r| window.contains(r.connected_on));
    WindowSplit { before, within }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rec(last: &str, on: NaiveDate) -> ContactRecord {
        ContactRecord::new(Some("x"), Some(last), on)
    }

    fn sample() -> Vec<ContactRecord> {
        vec![
            rec("Old", date(2023, 6, 1)),
            rec("Edge", date(2024, 1, 1)),
            rec("Inside", date(2024, 1, 2)),
            rec("JustBefore", date(2023, 12, 31)),
            rec("Future", date(2024, 5, 1)),
        ]
    }

    #[test]
    fn test_within_window_inclusive_lower_bound() {
        let records = sample();
        let window = TimeWindow::trailing(date(2024, 1, 2), 1);
        let within = within_window(&records, &window);

        let names: Vec<&str> = within.iter().filter_map(|r| r.surname()).collect();
        assert_eq!(names, vec!["Edge", "Inside", "Future"]);
        assert!(within.iter().all(|r| r.connected_on >= window.start_date));
    }

    #[test]
    fn test_before_window_strict() {
        let records = sample();
        let window = TimeWindow::trailing(date(2024, 1, 2), 1);
        let before = before_window(&records, &window);

        let names: Vec<&str> = before.iter().filter_map(|r| r.surname()).collect();
        assert_eq!(names, vec!["Old", "JustBefore"]);
    }

    #[test]
    fn test_split_partitions_every_record() {
        let records = sample();
        let window = TimeWindow::trailing(date(2024, 1, 2), 1);
        let split = split_by_window(&records, &window);

        assert_eq!(split.before.len() + split.within.len(), records.len());
        assert_eq!(split.within, within_window(&records, &window));
        assert_eq!(split.before, before_window(&records, &window));
    }

    #[test]
    fn test_filter_output_is_subset_of_input() {
        let records = sample();
        for days in [0u32, 1, 30, 365, 1000] {
            let window = TimeWindow::trailing(date(2024, 1, 2), days);
            for r in within_window(&records, &window) {
                assert!(records.contains(r));
                assert!(window.start_date <= r.connected_on);
            }
        }
    }

    #[test]
    fn test_filter_empty_input() {
        let window = TimeWindow::trailing(date(2024, 1, 2), 365);
        assert!(within_window(&[], &window).is_empty());
        let split = split_by_window(&[], &window);
        assert!(split.before.is_empty() && split.within.is_empty());
    }
}
