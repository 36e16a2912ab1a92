use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

/// The date layout LinkedIn uses in `Connected On`, e.g. `15-Jan-24`.
pub const EXPORT_DATE_FORMAT: &str = "%d-%b-%y";

/// Fallback date-only layouts, tried in order after [`EXPORT_DATE_FORMAT`].
const DATE_FORMATS: &[&str] = &[
    "%d %b %Y",
    "%Y-%m-%d",
    "%d-%b-%Y",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%Y/%m/%d",
    "%d.%m.%Y",
];

/// Fallback date-time layouts; only the date part is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

// ── ConnectionDateParser ──────────────────────────────────────────────────────

/// Parses the connection-date column of a contacts export.
pub struct ConnectionDateParser;

impl ConnectionDateParser {
    /// Parse `s` with the strict export layout first, then the looser ones.
    ///
    /// Returns `None` for blank or unrecognised values.
    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        if let Ok(date) = NaiveDate::parse_from_str(s, EXPORT_DATE_FORMAT) {
            return Some(date);
        }

        Self::parse_generic(s)
    }

    fn parse_generic(s: &str) -> Option<NaiveDate> {
        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.date_naive());
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(naive.date());
            }
        }

        debug!("could not parse connection date \"{}\"", s);
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
