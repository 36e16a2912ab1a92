use chrono::NaiveDate;

use crate::models::Granularity;

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use trend_core::formatting::format_count;
///
/// assert_eq!(format_count(0), "0");
/// assert_eq!(format_count(999), "999");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Human-readable label for a period key.
///
/// * `Day`   → `"2024-01-15"`
/// * `Month` → `"Jan 2024"`
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use trend_core::formatting::format_period;
/// use trend_core::models::Granularity;
///
/// let d = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
/// assert_eq!(format_period(d, Granularity::Day), "2024-01-15");
/// assert_eq!(format_period(d, Granularity::Month), "Jan 2024");
/// ```
pub fn format_period(period: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => period.format("%Y-%m-%d").to_string(),
        Granularity::Month => period.format("%b %Y").to_string(),
    }
}

/// Compact axis tick label for a period key (`"Jan 15"` / `"Jan 24"`).
pub fn format_tick(period: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => period.format("%b %d").to_string(),
        Granularity::Month => period.format("%b %y").to_string(),
    }
}

/// Insert a `,` every three digits from the right of a plain digit string.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    if len <= 3 {
        return digits.to_string();
    }
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
