//! Core data types shared by the loader, the aggregators and the UI.

use chrono::{Datelike, NaiveDate};

// ── ContactRecord ─────────────────────────────────────────────────────────────

/// One row of a contacts export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRecord {
    pub first_name: Option<String>,
    /// `None` when the export left the surname blank.
    pub last_name: Option<String>,
    pub connected_on: NaiveDate,
}

impl ContactRecord {
    pub fn new(first_name: Option<&str>, last_name: Option<&str>, connected_on: NaiveDate) -> Self {
        Self {
            first_name: non_blank(first_name),
            last_name: non_blank(last_name),
            connected_on,
        }
    }

    /// First and last name joined by a space, skipping whichever is missing.
    pub fn full_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => String::new(),
        }
    }

    pub fn surname(&self) -> Option<&str> {
        self.last_name.as_deref()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

// ── Granularity ───────────────────────────────────────────────────────────────

/// Width of one period in an [`AggregateSeries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Month,
}

impl Granularity {
    /// Map a date onto the key of the period containing it.
    pub fn period_key(self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Month => date.with_day(1).unwrap_or(date),
        }
    }
}

// ── AggregateSeries ───────────────────────────────────────────────────────────

/// A single `(period_key, value)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesPoint {
    pub period: NaiveDate,
    pub value: u64,
}

impl SeriesPoint {
    pub fn new(period: NaiveDate, value: u64) -> Self {
        Self { period, value }
    }
}

/// Ordered output of one aggregation run, consumed by the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSeries {
    pub granularity: Granularity,
    /// Sorted by `period`, ascending, without duplicate keys.
    pub points: Vec<SeriesPoint>,
}

impl AggregateSeries {
    pub fn new(granularity: Granularity, points: Vec<SeriesPoint>) -> Self {
        Self {
            granularity,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn values(&self) -> Vec<u64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn max_value(&self) -> Option<u64> {
        self.points.iter().map(|p| p.value).max()
    }

    pub fn first(&self) -> Option<&SeriesPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&SeriesPoint> {
        self.points.last()
    }
}

// ── SeriesSummary ─────────────────────────────────────────────────────────────

/// Headline numbers shown under the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesSummary {
    Running {
        /// Distinct surnames seen before the window opened.
        starting: u64,
        /// Distinct surnames at the last day of the window.
        current: u64,
        new_in_window: u64,
    },
    Monthly {
        /// Connections across all months in the series.
        total: u64,
        months: usize,
        /// Earliest month holding the highest count.
        busiest: Option<SeriesPoint>,
    },
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_contact_record_blank_names_are_none() {
        let rec = ContactRecord::new(Some("  "), Some(""), date(2024, 1, 1));
        assert!(rec.first_name.is_none());
        assert!(rec.surname().is_none());
        assert_eq!(rec.full_name(), "");
    }

    #[test]
    fn test_contact_record_trims_names() {
        let rec = ContactRecord::new(Some(" Ada "), Some(" Lovelace"), date(2024, 1, 1));
        assert_eq!(rec.surname(), Some("Lovelace"));
        assert_eq!(rec.full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_full_name_with_only_one_part() {
        let rec = ContactRecord::new(None, Some("Park"), date(2024, 3, 1));
        assert_eq!(rec.full_name(), "Park");
        let rec = ContactRecord::new(Some("Min"), None, date(2024, 3, 1));
        assert_eq!(rec.full_name(), "Min");
    }

    #[test]
    fn test_granularity_period_key() {
        assert_eq!(Granularity::Day.period_key(date(2024, 3, 17)), date(2024, 3, 17));
        assert_eq!(Granularity::Month.period_key(date(2024, 3, 17)), date(2024, 3, 1));
    }

    #[test]
    fn test_series_helpers() {
        let series = AggregateSeries::new(
            Granularity::Day,
            vec![
                SeriesPoint::new(date(2024, 1, 1), 3),
                SeriesPoint::new(date(2024, 1, 2), 3),
                SeriesPoint::new(date(2024, 1, 3), 5),
            ],
        );
        assert_eq!(series.len(), 3);
        assert_eq!(series.values(), vec![3, 3, 5]);
        assert_eq!(series.max_value(), Some(5));
    }

    #[test]
    fn test_empty_series() {
        let series = AggregateSeries::new(Granularity::Month, vec![]);
        assert!(series.is_empty());
        assert!(series.max_value().is_none());
        assert!(series.first().is_none());
    }
}
