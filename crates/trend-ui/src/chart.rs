//! Line chart of an [`AggregateSeries`] drawn on a ratatui canvas.
//!
//! One point per series entry, x spaced by calendar distance from the first
//! period, y the count. Optional per-point value labels, point markers, axis
//! spines with tick labels and titles, a dashed grid, a legend and a summary
//! footer.

use std::str::FromStr;

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points},
        Block, Borders, Paragraph, Widget,
    },
    Frame,
};
use unicode_width::UnicodeWidthStr;

use trend_core::formatting::{format_count, format_period, format_tick};
use trend_core::models::{AggregateSeries, Granularity, SeriesSummary};
use trend_core::settings::View;
use trend_core::{Result, TrendError};

use crate::themes::Theme;

/// `#0077B5`, the running-count line colour.
pub const LINKEDIN_BLUE: Color = Color::Rgb(0x00, 0x77, 0xB5);

const MARKER_SYMBOL: &str = "●";

// ── ChartOptions ──────────────────────────────────────────────────────────────

/// Display options for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub line_color: Color,
    /// Annotate each point with its integer value, one row above the marker.
    pub show_labels: bool,
    pub show_markers: bool,
    /// Left and bottom spines plus tick labels. Axis titles and the grid
    /// are only drawn while this is on.
    pub show_axes: bool,
    /// Dashed grid lines at quarter heights and at the x ticks.
    pub show_grid: bool,
    pub x_axis_title: Option<String>,
    /// Printed above the plot, left-aligned.
    pub y_axis_title: Option<String>,
    pub title: String,
    pub legend: Option<String>,
}

impl ChartOptions {
    /// Running distinct-surname chart: blue line, no labels or markers,
    /// titled axes over a dashed grid.
    pub fn running_preset(days: u32) -> Self {
        Self {
            line_color: LINKEDIN_BLUE,
            show_labels: false,
            show_markers: false,
            show_axes: true,
            show_grid: true,
            x_axis_title: Some("Date".to_string()),
            y_axis_title: Some("Count of Unique Last Names".to_string()),
            title: format!("Running Total of Unique Last Names - Last {} Days", days),
            legend: Some("Unique Last Names".to_string()),
        }
    }

    /// Monthly count chart: gray line, labelled markers, no axes.
    pub fn monthly_preset(days: u32) -> Self {
        Self {
            line_color: Color::Gray,
            show_labels: true,
            show_markers: true,
            show_axes: false,
            show_grid: false,
            x_axis_title: None,
            y_axis_title: None,
            title: format!("LinkedIn Connections Per Month - Last {} Days", days),
            legend: None,
        }
    }

    pub fn for_view(view: View, days: u32) -> Self {
        match view {
            View::Running => Self::running_preset(days),
            View::Monthly => Self::monthly_preset(days),
        }
    }
}

/// Parse a colour name (`"gray"`, `"lightblue"`) or `#RRGGBB`.
pub fn parse_color(value: &str) -> Result<Color> {
    Color::from_str(value.trim()).map_err(|_| TrendError::InvalidColor(value.to_string()))
}

// ── ChartSpec / ChartSurface ──────────────────────────────────────────────────

/// Everything a surface needs to draw one chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub series: AggregateSeries,
    pub options: ChartOptions,
    pub summary: Option<SeriesSummary>,
}

/// Something that can display a [`ChartSpec`].
pub trait ChartSurface {
    fn show(&mut self, spec: &ChartSpec) -> Result<()>;
}

// ── Labels ────────────────────────────────────────────────────────────────────

/// Where a value annotation goes, in data coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PointLabel {
    /// Days since the first period.
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// Calendar-day offset of every point from the first one.
pub fn x_offsets(series: &AggregateSeries) -> Vec<f64> {
    let Some(first) = series.first() else {
        return Vec::new();
    };
    series
        .points
        .iter()
        .map(|p| (p.period - first.period).num_days() as f64)
        .collect()
}

/// One label per point, carrying the point's exact integer value.
pub fn point_labels(series: &AggregateSeries) -> Vec<PointLabel> {
    x_offsets(series)
        .into_iter()
        .zip(&series.points)
        .map(|(x, p)| PointLabel {
            x,
            y: p.value as f64,
            text: p.value.to_string(),
        })
        .collect()
}

/// Headline line printed under the chart.
pub fn summary_line(summary: &SeriesSummary) -> String {
    match summary {
        SeriesSummary::Running {
            starting,
            current,
            new_in_window,
        } => format!(
            "Unique last names: {} | Before window: {} | New in window: {}",
            format_count(*current),
            format_count(*starting),
            format_count(*new_in_window)
        ),
        SeriesSummary::Monthly {
            total,
            months,
            busiest,
        } => {
            let mut line = format!(
                "Connections: {} | Months: {}",
                format_count(*total),
                months
            );
            if let Some(p) = busiest {
                line.push_str(&format!(
                    " | Busiest: {} ({})",
                    format_period(p.period, Granularity::Month),
                    format_count(p.value)
                ));
            }
            line
        }
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Upper y bound, leaving headroom for labels above the highest point.
fn y_top(max: u64, labels: bool) -> u64 {
    let headroom = if labels { max / 8 + 1 } else { max / 20 + 1 };
    max + headroom
}

/// Maps data coordinates to canvas cells the same way the canvas does when
/// it places printed text.
#[derive(Debug, Clone, Copy)]
struct CellGrid {
    x_span: f64,
    y_top: f64,
    cols: u16,
    rows: u16,
}

impl CellGrid {
    fn column(&self, x: f64) -> u16 {
        if self.cols <= 1 {
            return 0;
        }
        (x * f64::from(self.cols - 1) / self.x_span) as u16
    }

    fn row(&self, y: f64) -> u16 {
        if self.rows <= 1 {
            return 0;
        }
        ((self.y_top - y) * f64::from(self.rows - 1) / self.y_top) as u16
    }

    /// Data x that lands in `col`.
    fn x_at(&self, col: u16) -> f64 {
        if self.cols <= 1 {
            return 0.0;
        }
        let last = f64::from(self.cols - 1);
        let c = (f64::from(col) + 0.5).min(last);
        (c * self.x_span / last).min(self.x_span)
    }

    /// Data y that lands in `row`.
    fn y_at(&self, row: u16) -> f64 {
        if self.rows <= 1 {
            return self.y_top;
        }
        let last = f64::from(self.rows - 1);
        let r = (f64::from(row) + 0.5).min(last);
        (self.y_top - r * self.y_top / last).max(0.0)
    }
}

/// Dashed grid in data coordinates, one dot per cell: horizontal lines at
/// quarter heights (two cells on, two off) and vertical lines at `x_ticks`
/// (every other row).
fn grid_points(grid: &CellGrid, x_ticks: &[f64]) -> Vec<(f64, f64)> {
    let mut points = Vec::new();
    for quarter in 1..4u8 {
        let y = grid.y_top * f64::from(quarter) / 4.0;
        points.extend(
            (0..grid.cols)
                .filter(|col| col % 4 < 2)
                .map(|col| (grid.x_at(col), y)),
        );
    }
    for &x in x_ticks {
        points.extend(
            (0..grid.rows)
                .filter(|row| row % 2 == 0)
                .map(|row| (x, grid.y_at(row))),
        );
    }
    points
}

/// Indices of the points that get an x tick: first, middle and last.
fn tick_indices(series: &AggregateSeries) -> Vec<usize> {
    if series.is_empty() {
        return Vec::new();
    }
    let last_index = series.len() - 1;
    let mut picks = vec![0];
    if series.len() > 2 {
        picks.push(last_index / 2);
    }
    if last_index > 0 {
        picks.push(last_index);
    }
    picks
}

/// Text printed on the canvas after the line.
struct Overlay {
    x: f64,
    y: f64,
    text: String,
    style: Style,
}

fn overlays(spec: &ChartSpec, grid: &CellGrid, theme: &Theme) -> Vec<Overlay> {
    let opts = &spec.options;
    let mut out = Vec::new();

    for label in point_labels(&spec.series) {
        let col = grid.column(label.x);
        let row = grid.row(label.y);

        if opts.show_markers {
            out.push(Overlay {
                x: grid.x_at(col),
                y: grid.y_at(row),
                text: MARKER_SYMBOL.to_string(),
                style: Style::default().fg(opts.line_color),
            });
        }

        if opts.show_labels {
            let width = label.text.width() as u16;
            let start = col
                .saturating_sub(width.saturating_sub(1) / 2)
                .min(grid.cols.saturating_sub(width));
            out.push(Overlay {
                x: grid.x_at(start),
                y: grid.y_at(row.saturating_sub(1)),
                text: label.text,
                style: theme.label,
            });
        }
    }

    out
}

// ── TrendChart widget ─────────────────────────────────────────────────────────

/// Title, plot and summary footer for one [`ChartSpec`].
pub struct TrendChart<'a> {
    spec: &'a ChartSpec,
    theme: &'a Theme,
}

impl<'a> TrendChart<'a> {
    pub fn new(spec: &'a ChartSpec, theme: &'a Theme) -> Self {
        Self { spec, theme }
    }
}

impl Widget for TrendChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [title_area, body, footer] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(area);

        Line::styled(self.spec.options.title.clone(), self.theme.title)
            .centered()
            .render(title_area, buf);

        if let Some(summary) = &self.spec.summary {
            Line::styled(summary_line(summary), self.theme.dim).render(footer, buf);
        }

        if self.spec.series.is_empty() {
            no_data_paragraph(self.theme).render(body, buf);
            return;
        }

        render_plot(self.spec, self.theme, body, buf);
    }
}

fn render_plot(spec: &ChartSpec, theme: &Theme, area: Rect, buf: &mut Buffer) {
    let opts = &spec.options;
    let series = &spec.series;
    let max_value = series.max_value().unwrap_or(0);
    let top = y_top(max_value, opts.show_labels);
    let offsets = x_offsets(series);
    let x_span = offsets.last().copied().unwrap_or(0.0).max(1.0);

    let (area, y_title_row, x_title_row) = if opts.show_axes {
        let [y_title_row, rest, x_title_row] = Layout::vertical([
            Constraint::Length(u16::from(opts.y_axis_title.is_some())),
            Constraint::Min(1),
            Constraint::Length(u16::from(opts.x_axis_title.is_some())),
        ])
        .areas(area);
        (rest, Some(y_title_row), Some(x_title_row))
    } else {
        (area, None, None)
    };

    let (canvas_area, gutter, tick_row) = if opts.show_axes {
        let top_label = format_count(top);
        let gutter_width = top_label.width() as u16 + 1;
        let [gutter, plot] =
            Layout::horizontal([Constraint::Length(gutter_width), Constraint::Min(1)]).areas(area);
        let [canvas_area, tick_row] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(plot);
        (canvas_area, Some((gutter, top_label)), Some(tick_row))
    } else {
        (area, None, None)
    };

    let block = if opts.show_axes {
        Block::default()
            .borders(Borders::LEFT | Borders::BOTTOM)
            .border_style(theme.axis)
    } else {
        Block::default()
    };
    let inner = block.inner(canvas_area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let grid = CellGrid {
        x_span,
        y_top: top as f64,
        cols: inner.width,
        rows: inner.height,
    };
    let coords: Vec<(f64, f64)> = offsets
        .iter()
        .zip(&series.points)
        .map(|(x, p)| (*x, p.value as f64))
        .collect();
    let overlays = overlays(spec, &grid, theme);
    let color = opts.line_color;

    let grid_dots = if opts.show_axes && opts.show_grid {
        let tick_xs: Vec<f64> = tick_indices(series)
            .into_iter()
            .map(|i| offsets[i])
            .filter(|x| *x > 0.0)
            .collect();
        grid_points(&grid, &tick_xs)
    } else {
        Vec::new()
    };
    let grid_color = theme.dim.fg.unwrap_or(Color::DarkGray);

    Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds([0.0, x_span])
        .y_bounds([0.0, top as f64])
        .paint(|ctx| {
            if !grid_dots.is_empty() {
                ctx.draw(&Points {
                    coords: &grid_dots,
                    color: grid_color,
                });
                ctx.layer();
            }
            for pair in coords.windows(2) {
                ctx.draw(&CanvasLine::new(
                    pair[0].0, pair[0].1, pair[1].0, pair[1].1, color,
                ));
            }
            if coords.len() == 1 {
                ctx.draw(&Points {
                    coords: &coords,
                    color,
                });
            }
            ctx.layer();
            for o in &overlays {
                ctx.print(o.x, o.y, Line::styled(o.text.clone(), o.style));
            }
        })
        .render(canvas_area, buf);

    if let Some((gutter, top_label)) = gutter {
        let right = gutter.right().saturating_sub(1);
        let top_x = right.saturating_sub(top_label.width() as u16);
        buf.set_string(top_x, inner.top(), &top_label, theme.axis);
        buf.set_string(right.saturating_sub(1), inner.bottom() - 1, "0", theme.axis);
    }

    if let Some(tick_row) = tick_row {
        render_x_ticks(series, &grid, inner, tick_row, theme, buf);
    }

    let title_style = theme.axis.add_modifier(Modifier::BOLD);
    if let (Some(row), Some(text)) = (y_title_row, &opts.y_axis_title) {
        Line::styled(text.clone(), title_style).render(row, buf);
    }
    if let (Some(row), Some(text)) = (x_title_row, &opts.x_axis_title) {
        let under_plot = Rect::new(inner.left(), row.top(), inner.width, row.height);
        Line::styled(text.clone(), title_style)
            .centered()
            .render(under_plot, buf);
    }

    if let Some(legend) = &opts.legend {
        let line = Line::from(vec![
            Span::styled("── ", Style::default().fg(color)),
            Span::styled(legend.clone(), theme.text),
        ]);
        let width = line.width() as u16;
        if width < inner.width {
            buf.set_line(inner.right() - width - 1, inner.top(), &line, width);
        }
    }
}

/// First, middle and last period under the plot, skipping any that collide.
fn render_x_ticks(
    series: &AggregateSeries,
    grid: &CellGrid,
    inner: Rect,
    row: Rect,
    theme: &Theme,
    buf: &mut Buffer,
) {
    let offsets = x_offsets(series);
    let last_index = series.len().saturating_sub(1);
    let picks = tick_indices(series);

    let mut next_free = row.left();
    for (n, index) in picks.iter().enumerate() {
        let text = format_tick(series.points[*index].period, series.granularity);
        let width = text.width() as u16;
        let col = inner.left() + grid.column(offsets[*index]);
        let x = if n == 0 {
            inner.left()
        } else if *index == last_index {
            inner.right().saturating_sub(width)
        } else {
            col.saturating_sub(width / 2)
        };
        if x < next_free || x + width > row.right() {
            continue;
        }
        buf.set_string(x, row.top(), &text, theme.axis);
        next_free = x + width + 1;
    }
}

// ── Frame helpers ─────────────────────────────────────────────────────────────

/// Render the chart for `spec` into `area`.
pub fn render_chart(frame: &mut Frame, area: Rect, spec: &ChartSpec, theme: &Theme) {
    frame.render_widget(TrendChart::new(spec, theme), area);
}

/// Placeholder shown when the series has no points.
fn no_data_paragraph(theme: &Theme) -> Paragraph<'static> {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled("No connections in this window", theme.warning)),
        Line::from(""),
        Line::from(Span::styled(
            "Try a longer --days value or check the export's dates.",
            theme.dim,
        )),
    ];
    Paragraph::new(text).block(Block::default().borders(Borders::ALL))
}

// ── Snapshots ─────────────────────────────────────────────────────────────────

/// Render off-screen and return the characters, one line per row.
pub fn render_snapshot(spec: &ChartSpec, theme: &Theme, width: u16, height: u16) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    TrendChart::new(spec, theme).render(area, &mut buf);
    buffer_to_string(&buf)
}

/// Cell symbols of `buf`, trailing blanks trimmed per row.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in area.top()..area.bottom() {
        let mut line = String::new();
        for x in area.left()..area.right() {
            line.push_str(buf[(x, y)].symbol());
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
