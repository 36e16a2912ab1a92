//! One run: load the export, aggregate, build the chart and show it.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::info;

use trend_core::settings::Settings;
use trend_core::time_utils::{timezone_or_utc, TimeWindow};
use trend_data::analysis::analyze_connections;
use trend_data::reader::TextEncoding;
use trend_ui::chart::{parse_color, render_snapshot, ChartOptions, ChartSpec, ChartSurface};
use trend_ui::themes::Theme;

/// Size of the `--save` text snapshot, in terminal cells.
pub const SNAPSHOT_WIDTH: u16 = 120;
pub const SNAPSHOT_HEIGHT: u16 = 32;

/// Chart options for the selected view with command-line overrides applied.
pub fn chart_options(settings: &Settings) -> Result<ChartOptions> {
    let mut options = ChartOptions::for_view(settings.view, settings.days);

    if let Some(color) = &settings.color {
        options.line_color = parse_color(color)?;
    }
    if let Some(labels) = settings.labels_override() {
        options.show_labels = labels;
    }
    if let Some(axes) = settings.axes_override() {
        options.show_axes = axes;
    }
    if let Some(title) = &settings.title {
        options.title = title.clone();
    }

    Ok(options)
}

/// Load and aggregate the export named in `settings`, with "today" taken
/// from `now` in the configured timezone.
pub fn build_chart(settings: &Settings, now: DateTime<Utc>) -> Result<ChartSpec> {
    // Reject a bad --color before touching the file.
    let options = chart_options(settings)?;

    let tz = timezone_or_utc(&settings.timezone);
    let window = TimeWindow::anchored(now, tz, settings.days);
    info!(
        start = %window.start_date,
        end = %window.end_date,
        view = ?settings.view,
        "Charting {}",
        settings.csv_file.display()
    );

    let analysis = analyze_connections(
        &settings.csv_file,
        TextEncoding::from_name(&settings.encoding),
        settings.view,
        &window,
    )
    .with_context(|| format!("Could not load {}", settings.csv_file.display()))?;

    Ok(ChartSpec {
        series: analysis.series,
        options,
        summary: Some(analysis.summary),
    })
}

/// Build the chart, optionally save a text snapshot, then hand it to
/// `surface`.
pub fn run<S: ChartSurface>(settings: &Settings, now: DateTime<Utc>, surface: &mut S) -> Result<()> {
    let spec = build_chart(settings, now)?;

    if let Some(path) = &settings.save {
        let snapshot = render_snapshot(
            &spec,
            &Theme::from_name(&settings.theme),
            SNAPSHOT_WIDTH,
            SNAPSHOT_HEIGHT,
        );
        std::fs::write(path, snapshot)
            .with_context(|| format!("Failed to save chart to {}", path.display()))?;
        info!("Saved chart snapshot to {}", path.display());
    }

    surface.show(&spec).context("Failed to display chart")?;
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
