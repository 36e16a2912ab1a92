use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the connections trend pipeline.
#[derive(Error, Debug)]
pub enum TrendError {
    /// The export file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export is not valid delimited text.
    #[error("Malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// None of the accepted header names for a required column was found.
    #[error("Missing column \"{column}\" in {path}")]
    MissingColumn { path: PathBuf, column: String },

    /// A row's connection date did not match any supported format.
    ///
    /// Row-level: the loader drops the row and carries on.
    #[error("Unparseable date \"{value}\" on line {line}")]
    DateParse { line: u64, value: String },

    /// A `--color` value is neither a known colour name nor `#RRGGBB`.
    #[error("Invalid colour: {0}")]
    InvalidColor(String),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TrendError {
    /// `true` for the errors that abort a load (as opposed to row-level ones).
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            TrendError::FileRead { .. } | TrendError::Csv { .. } | TrendError::MissingColumn { .. }
        )
    }
}

/// Convenience alias used throughout the trend crates.
pub type Result<T> = std::result::Result<T, TrendError>;
