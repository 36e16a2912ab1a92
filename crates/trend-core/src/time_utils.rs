use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::warn;

use crate::error::{Result, TrendError};

/// Trailing window length used when none is given.
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Parse an IANA timezone name.
pub fn parse_timezone(tz_name: &str) -> Result<Tz> {
    tz_name
        .parse::<Tz>()
        .map_err(|_| TrendError::Config(format!("unknown timezone \"{}\"", tz_name)))
}

/// Like [`parse_timezone`] but falls back to UTC with a warning.
pub fn timezone_or_utc(tz_name: &str) -> Tz {
    parse_timezone(tz_name).unwrap_or_else(|_| {
        warn!("unrecognised timezone \"{}\", falling back to UTC", tz_name);
        Tz::UTC
    })
}

/// Calendar date of `now` as seen in `tz`.
pub fn local_date(now: DateTime<Utc>, tz: Tz) -> NaiveDate {
    now.with_timezone(&tz).date_naive()
}

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// Trailing date range `[start_date, end_date]`.
///
/// `end_date` is "today" at the reference instant. The date filter only
/// applies the lower bound; `end_date` bounds the per-day iteration of the
/// running count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: u32,
}

impl TimeWindow {
    /// Window ending on `today` and starting `days` days earlier.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let start_date = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            start_date,
            end_date: today,
            days,
        }
    }

    /// Window anchored at the reference instant `now`, read in `tz`.
    pub fn anchored(now: DateTime<Utc>, tz: Tz, days: u32) -> Self {
        Self::trailing(local_date(now, tz), days)
    }

    /// `true` when `date` is on or after `start_date`.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date
    }

    /// `true` when `date` is strictly before `start_date`.
    pub fn precedes(&self, date: NaiveDate) -> bool {
        date < self.start_date
    }

    /// Number of calendar days in `[start_date, end_date]`.
    pub fn day_count(&self) -> usize {
        let span = (self.end_date - self.start_date).num_days();
        usize::try_from(span + 1).unwrap_or(0)
    }

    /// Every calendar day from `start_date` through `end_date`, inclusive.
    pub fn day_range(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |d| *d <= end)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_get_system_timezone_non_empty() {
        assert!(!get_system_timezone().is_empty());
    }

    #[test]
    fn test_parse_timezone_valid_and_invalid() {
        assert_eq!(parse_timezone("Europe/Berlin").unwrap(), Tz::Europe__Berlin);
        assert!(matches!(
            parse_timezone("Mars/Olympus"),
            Err(TrendError::Config(_))
        ));
        assert_eq!(timezone_or_utc("Mars/Olympus"), Tz::UTC);
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 23:30 UTC on Jan 1 is already Jan 2 in Tokyo.
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        assert_eq!(local_date(now, Tz::UTC), date(2024, 1, 1));
        assert_eq!(local_date(now, Tz::Asia__Tokyo), date(2024, 1, 2));
    }

    #[test]
    fn test_trailing_window_default_length() {
        let window = TimeWindow::trailing(date(2024, 12, 31), DEFAULT_WINDOW_DAYS);
        assert_eq!(window.start_date, date(2024, 1, 1));
        assert_eq!(window.end_date, date(2024, 12, 31));
        assert_eq!(window.day_count(), 366);
    }

    #[test]
    fn test_day_range_matches_day_count() {
        let window = TimeWindow::trailing(date(2024, 3, 1), 30);
        let days: Vec<NaiveDate> = window.day_range().collect();
        assert_eq!(days.len(), window.day_count());
        assert_eq!(days.first(), Some(&window.start_date));
        assert_eq!(days.last(), Some(&date(2024, 3, 1)));
    }

    #[test]
    fn test_zero_day_window_has_one_day() {
        let window = TimeWindow::trailing(date(2024, 5, 5), 0);
        assert_eq!(window.day_count(), 1);
        assert_eq!(window.day_range().count(), 1);
    }

    #[test]
    fn test_contains_and_precedes() {
        let window = TimeWindow::trailing(date(2024, 1, 2), 1);
        assert!(window.contains(date(2024, 1, 1)));
        assert!(window.contains(date(2024, 6, 1)));
        assert!(!window.contains(date(2023, 12, 31)));
        assert!(window.precedes(date(2023, 12, 31)));
        assert!(!window.precedes(date(2024, 1, 1)));
    }

    #[test]
    fn test_anchored_uses_timezone() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        let window = TimeWindow::anchored(now, Tz::Asia__Tokyo, 1);
        assert_eq!(window.end_date, date(2024, 1, 2));
        assert_eq!(window.start_date, date(2024, 1, 1));
    }
}
