//! Load, filter and aggregate in one call.
//!
//! Returns an [`AnalysisResult`] ready for the chart layer.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};
use trend_core::models::{AggregateSeries, ContactRecord, SeriesSummary};
use trend_core::settings::View;
use trend_core::time_utils::TimeWindow;
use trend_core::Result;

use crate::aggregator::ConnectionAggregator;
use crate::filter::split_by_window;
use crate::reader::{load_contacts, TextEncoding};

// ── Public types ──────────────────────────────────────────────────────────────

/// Bookkeeping produced alongside the series.
#[derive(Debug, Clone)]
pub struct AnalysisMetadata {
    pub window: TimeWindow,
    /// Data rows seen in the file, rejected ones included.
    pub rows_read: usize,
    /// Rows skipped because their date could not be parsed.
    pub rows_rejected: usize,
    pub records_in_window: usize,
    pub records_before_window: usize,
    /// Wall-clock seconds spent reading and parsing the file.
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent filtering and aggregating.
    pub aggregate_time_seconds: f64,
}

/// The complete output of [`analyze_connections`].
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub series: AggregateSeries,
    pub summary: SeriesSummary,
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// `true` when no record fell inside the window.
    pub fn window_is_empty(&self) -> bool {
        self.metadata.records_in_window == 0
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline against a file on disk.
///
/// 1. Decode and parse the export.
/// 2. Split the records around `window.start_date`.
/// 3. Aggregate according to `view`.
///
/// Fails only when the file cannot be read or is structurally broken. Rows
/// with bad dates are skipped and reported once as a warning.
pub fn analyze_connections(
    path: &Path,
    encoding: TextEncoding,
    view: View,
    window: &TimeWindow,
) -> Result<AnalysisResult> {
    let load_start = Instant::now();
    let loaded = load_contacts(path, encoding)?;
    let load_time = load_start.elapsed().as_secs_f64();

    if !loaded.rejected.is_empty() {
        warn!(
            rejected = loaded.rejected.len(),
            path = %path.display(),
            "Skipped rows with unparseable dates"
        );
        for err in &loaded.rejected {
            debug!("{}", err);
        }
    }

    let mut result = analyze_records(&loaded.records, view, window);
    result.metadata.rows_read = loaded.rows_read;
    result.metadata.rows_rejected = loaded.rejected.len();
    result.metadata.load_time_seconds = load_time;

    info!(
        rows = loaded.rows_read,
        in_window = result.metadata.records_in_window,
        points = result.series.len(),
        summary = ?result.summary,
        "Analysis complete"
    );
    Ok(result)
}

/// Aggregate already-parsed records. Pure apart from logging.
pub fn analyze_records(records: &[ContactRecord], view: View, window: &TimeWindow) -> AnalysisResult {
    let start = Instant::now();
    let split = split_by_window(records, window);

    if split.within.is_empty() {
        warn!(
            start = %window.start_date,
            end = %window.end_date,
            "No connections fall inside the window"
        );
    }

    let (series, summary) = match view {
        View::Running => {
            let series =
                ConnectionAggregator::running_distinct_surnames(&split.before, &split.within, window);
            let starting = ConnectionAggregator::seed_surname_count(&split.before);
            let summary = ConnectionAggregator::summarize_running(&series, starting);
            (series, summary)
        }
        View::Monthly => {
            let series = ConnectionAggregator::monthly_connection_counts(&split.within);
            let summary = ConnectionAggregator::summarize_buckets(&series);
            (series, summary)
        }
    };

    let metadata = AnalysisMetadata {
        window: *window,
        rows_read: records.len(),
        rows_rejected: 0,
        records_in_window: split.within.len(),
        records_before_window: split.before.len(),
        load_time_seconds: 0.0,
        aggregate_time_seconds: start.elapsed().as_secs_f64(),
    };

    AnalysisResult {
        series,
        summary,
        metadata,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::TempDir;
    use trend_core::models::Granularity;
    use trend_core::TrendError;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        for line in lines {
            writeln!(file, "{}", line).unwrap();
        }
        path
    }

    fn sample_export(dir: &Path) -> std::path::PathBuf {
        write_csv(
            dir,
            "Connections.csv",
            &[
                "Notes:",
                "\"When exporting your connection data, you may notice...\"",
                "",
                "First Name,Last Name,URL,Email Address,Company,Position,Connected On",
                "Ada,Lovelace,,,Engines,Analyst,15-Jun-23",
                "Grace,Hopper,,,Navy,Admiral,01-Jan-24",
                "Alan,Turing,,,Bletchley,Cryptanalyst,02-Jan-24",
                "Joan,Clarke,,,Bletchley,Cryptanalyst,not a date",
                "Anon,,,,,,02-Jan-24",
            ],
        )
    }

    #[test]
    fn test_analyze_connections_running() {
        let dir = TempDir::new().unwrap();
        let path = sample_export(dir.path());
        let window = TimeWindow::trailing(date(2024, 1, 2), 1);

        let result =
            analyze_connections(&path, TextEncoding::Windows1252, View::Running, &window).unwrap();

        assert_eq!(result.series.granularity, Granularity::Day);
        assert_eq!(result.series.values(), vec![2, 3]);
        assert_eq!(
            result.summary,
            SeriesSummary::Running {
                starting: 1,
                current: 3,
                new_in_window: 2,
            }
        );
        assert_eq!(result.metadata.rows_read, 5);
        assert_eq!(result.metadata.rows_rejected, 1);
        assert_eq!(result.metadata.records_in_window, 3);
        assert_eq!(result.metadata.records_before_window, 1);
        assert!(!result.window_is_empty());
    }

    #[test]
    fn test_analyze_connections_monthly() {
        let dir = TempDir::new().unwrap();
        let path = sample_export(dir.path());
        let window = TimeWindow::trailing(date(2024, 1, 2), 365);

        let result =
            analyze_connections(&path, TextEncoding::Windows1252, View::Monthly, &window).unwrap();

        assert_eq!(result.series.granularity, Granularity::Month);
        assert_eq!(
            result.series.points.iter().map(|p| (p.period, p.value)).collect::<Vec<_>>(),
            vec![(date(2023, 6, 1), 1), (date(2024, 1, 1), 3)]
        );
        match result.summary {
            SeriesSummary::Monthly { total, months, .. } => {
                assert_eq!(total, 4);
                assert_eq!(months, 2);
            }
            other => panic!("unexpected summary {:?}", other),
        }
    }

    #[test]
    fn test_analyze_connections_missing_file() {
        let dir = TempDir::new().unwrap();
        let window = TimeWindow::trailing(date(2024, 1, 2), 30);
        let err = analyze_connections(
            &dir.path().join("absent.csv"),
            TextEncoding::Windows1252,
            View::Running,
            &window,
        )
        .unwrap_err();
        assert!(matches!(err, TrendError::FileRead { .. }));
    }

    #[test]
    fn test_analyze_connections_missing_date_column() {
        let dir = TempDir::new().unwrap();
        let path = write_csv(dir.path(), "bad.csv", &["First Name,Last Name", "Ada,Lovelace"]);
        let window = TimeWindow::trailing(date(2024, 1, 2), 30);
        let err = analyze_connections(&path, TextEncoding::Utf8, View::Monthly, &window).unwrap_err();
        assert!(matches!(err, TrendError::MissingColumn { .. }));
    }

    #[test]
    fn test_analyze_records_empty_window_running_is_flat() {
        let records = vec![
            ContactRecord::new(Some("A"), Some("Adams"), date(2020, 1, 1)),
            ContactRecord::new(Some("B"), Some("Baker"), date(2020, 2, 1)),
        ];
        let window = TimeWindow::trailing(date(2024, 1, 10), 3);

        let result = analyze_records(&records, View::Running, &window);
        assert!(result.window_is_empty());
        assert_eq!(result.series.values(), vec![2, 2, 2, 2]);
    }

    #[test]
    fn test_analyze_records_empty_window_monthly_has_no_points() {
        let records = vec![ContactRecord::new(None, Some("Adams"), date(2020, 1, 1))];
        let window = TimeWindow::trailing(date(2024, 1, 10), 3);

        let result = analyze_records(&records, View::Monthly, &window);
        assert!(result.series.is_empty());
        assert!(result.window_is_empty());
    }

    #[test]
    fn test_analyze_records_no_input() {
        let window = TimeWindow::trailing(date(2024, 1, 10), 2);
        let result = analyze_records(&[], View::Running, &window);
        assert_eq!(result.series.values(), vec![0, 0, 0]);
        assert_eq!(result.metadata.rows_read, 0);
    }
}
