use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::time_utils::DEFAULT_WINDOW_DAYS;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Chart how your LinkedIn network grew over a trailing window
#[derive(Parser, Debug, Clone)]
#[command(
    name = "connections-trend",
    about = "Chart how your LinkedIn network grew over a trailing window",
    version
)]
pub struct Settings {
    /// Path to the exported connections CSV
    #[arg(default_value = "Connections.csv")]
    pub csv_file: PathBuf,

    /// Aggregation to chart
    #[arg(long, value_enum, default_value_t = View::Running)]
    pub view: View,

    /// Length of the trailing window in days
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS, value_parser = clap::value_parser!(u32).range(1..=36500))]
    pub days: u32,

    /// Text encoding of the export
    #[arg(long, default_value = "windows-1252", value_parser = ["windows-1252", "utf-8"])]
    pub encoding: String,

    /// Timezone used to decide what "today" is (auto-detected if not specified)
    #[arg(long, default_value = "auto")]
    pub timezone: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Line colour, a colour name or #RRGGBB (defaults depend on the view)
    #[arg(long)]
    pub color: Option<String>,

    /// Annotate every point with its value
    #[arg(long, overrides_with = "no_labels")]
    pub labels: bool,

    /// Do not annotate points
    #[arg(long, overrides_with = "labels")]
    pub no_labels: bool,

    /// Hide axis lines and tick labels
    #[arg(long, overrides_with = "show_axes")]
    pub hide_axes: bool,

    /// Show axis lines and tick labels
    #[arg(long, overrides_with = "hide_axes")]
    pub show_axes: bool,

    /// Chart title (defaults depend on the view)
    #[arg(long)]
    pub title: Option<String>,

    /// Also write a plain-text snapshot of the chart to this path
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (logs go to stderr otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

/// Which aggregation a run charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Running count of distinct surnames, one point per day.
    Running,
    /// Connections per calendar month, empty months omitted.
    Monthly,
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse the process arguments and resolve `"auto"` values.
    pub fn load() -> Self {
        Self::load_from_args(std::env::args_os().collect())
    }

    /// Same as [`Settings::load`] with an explicit argument list.
    pub fn load_from_args(args: Vec<std::ffi::OsString>) -> Self {
        Self::resolve_auto_values(Settings::parse_from(args))
    }

    /// Resolve `"auto"` sentinel values and apply the `--debug` flag.
    ///
    /// The theme keeps its `"auto"` value; the UI detects the background
    /// itself.
    fn resolve_auto_values(mut settings: Settings) -> Settings {
        if settings.timezone == "auto" {
            settings.timezone = crate::time_utils::get_system_timezone();
        }

        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }

        settings
    }

    /// `Some(true)` for `--labels`, `Some(false)` for `--no-labels`, `None`
    /// when the view's preset should decide.
    pub fn labels_override(&self) -> Option<bool> {
        explicit_toggle(self.labels, self.no_labels)
    }

    /// Same convention as [`Settings::labels_override`] for the axes.
    pub fn axes_override(&self) -> Option<bool> {
        explicit_toggle(self.show_axes, self.hide_axes)
    }
}

fn explicit_toggle(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (false, true) => Some(false),
        (false, false) => None,
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
