//! Contact aggregation over daily and monthly periods.
//!
//! Two deliberately different operations live here: a running count of
//! distinct surnames (one point per day of the window) and a per-month row
//! count (empty months omitted). They are not interchangeable.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use trend_core::models::{AggregateSeries, ContactRecord, Granularity, SeriesPoint, SeriesSummary};
use trend_core::time_utils::TimeWindow;

// ── ConnectionAggregator ──────────────────────────────────────────────────────

/// Stateless helper that turns filtered records into an [`AggregateSeries`].
pub struct ConnectionAggregator;

impl ConnectionAggregator {
    /// Running count of distinct surnames for every day of `window`.
    ///
    /// The set is seeded with the surnames in `before`, then for each day in
    /// `[start_date, end_date]` the surnames of `within` records dated that
    /// day are added and the set size is emitted. Days without records repeat
    /// the previous total. Records without a surname never enter the set, and
    /// different people sharing a surname count once.
    pub fn running_distinct_surnames(
        before: &[&ContactRecord],
        within: &[&ContactRecord],
        window: &TimeWindow,
    ) -> AggregateSeries {
        let mut seen: HashSet<&str> = before.iter().filter_map(|r| r.surname()).collect();

        let mut by_day: BTreeMap<NaiveDate, Vec<&str>> = BTreeMap::new();
        for record in within {
            if let Some(surname) = record.surname() {
                by_day.entry(record.connected_on).or_default().push(surname);
            }
        }

        let mut points = Vec::with_capacity(window.day_count());
        for day in window.day_range() {
            if let Some(surnames) = by_day.get(&day) {
                seen.extend(surnames.iter().copied());
            }
            points.push(SeriesPoint::new(day, seen.len() as u64));
        }

        AggregateSeries::new(Granularity::Day, points)
    }

    /// Number of distinct surnames among `before`, the running count's seed.
    pub fn seed_surname_count(before: &[&ContactRecord]) -> u64 {
        before
            .iter()
            .filter_map(|r| r.surname())
            .collect::<HashSet<_>>()
            .len() as u64
    }

    /// Rows per calendar month, keyed by the first day of the month.
    ///
    /// Every row counts, with or without a surname. Months with no rows are
    /// omitted rather than zero-filled. Sorted by month, ascending.
    pub fn monthly_connection_counts(within: &[&ContactRecord]) -> AggregateSeries {
        // BTreeMap keeps the months sorted.
        let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for record in within {
            *counts
                .entry(Granularity::Month.period_key(record.connected_on))
                .or_insert(0) += 1;
        }

        let points = counts
            .into_iter()
            .map(|(period, value)| SeriesPoint::new(period, value))
            .collect();
        AggregateSeries::new(Granularity::Month, points)
    }

    /// Summary for a running series; `starting` is the seed size.
    pub fn summarize_running(series: &AggregateSeries, starting: u64) -> SeriesSummary {
        let current = series.last().map(|p| p.value).unwrap_or(starting);
        SeriesSummary::Running {
            starting,
            current,
            new_in_window: current.saturating_sub(starting),
        }
    }

    /// Summary for a bucketed series.
    pub fn summarize_buckets(series: &AggregateSeries) -> SeriesSummary {
        let total = series.points.iter().map(|p| p.value).sum();
        let busiest = series
            .points
            .iter()
            .copied()
            .fold(None, |best: Option<SeriesPoint>, p| match best {
                Some(b) if b.value >= p.value => Some(b),
                _ => Some(p),
            });
        SeriesSummary::Monthly {
            total,
            months: series.len(),
            busiest,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
