//! Contacts export loading.
//!
//! Reads a LinkedIn `Connections.csv` (Windows-1252 by default), skips the
//! free-text preamble LinkedIn puts above the header, and converts each row
//! into a [`ContactRecord`]. Rows whose date cannot be parsed are reported
//! back instead of aborting the load.

use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};
use serde::Deserialize;
use tracing::{debug, warn};
use trend_core::dates::ConnectionDateParser;
use trend_core::models::ContactRecord;
use trend_core::{Result, TrendError};

/// Header names accepted for the connection-date column, most preferred first.
pub const CONNECTED_ON_COLUMNS: &[&str] = &["Connected On", "connected_on", "Date"];

const FIRST_NAME_COLUMNS: &[&str] = &["First Name", "first_name"];
const LAST_NAME_COLUMNS: &[&str] = &["Last Name", "last_name", "Surname"];

/// Alias groups; the first entry of each is the name `RawContactRow` expects.
const COLUMN_ALIASES: [&[&str]; 3] = [FIRST_NAME_COLUMNS, LAST_NAME_COLUMNS, CONNECTED_ON_COLUMNS];

// ── Public types ──────────────────────────────────────────────────────────────

/// Text encoding of the export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Windows1252,
    Utf8,
}

impl TextEncoding {
    /// Map a `--encoding` value onto an encoding. Unknown names fall back to
    /// Windows-1252, the encoding LinkedIn exports use.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => TextEncoding::Utf8,
            _ => TextEncoding::Windows1252,
        }
    }

    fn encoding(self) -> &'static Encoding {
        match self {
            TextEncoding::Windows1252 => WINDOWS_1252,
            TextEncoding::Utf8 => UTF_8,
        }
    }
}

/// Result of loading one export file.
#[derive(Debug)]
pub struct LoadedContacts {
    /// Accepted records, in file order.
    pub records: Vec<ContactRecord>,
    /// One [`TrendError::DateParse`] per dropped row.
    pub rejected: Vec<TrendError>,
    /// Data rows seen after the header, accepted or not.
    pub rows_read: usize,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Read and parse the export at `path`.
///
/// Fails when the file cannot be read, is not delimited text, or has no
/// connection-date column.
pub fn load_contacts(path: &Path, encoding: TextEncoding) -> Result<LoadedContacts> {
    let bytes = std::fs::read(path).map_err(|source| TrendError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let text = decode(&bytes, encoding);
    let loaded = parse_contacts(&text, path)?;

    debug!(
        "Loaded {} records ({} rejected) from {}",
        loaded.records.len(),
        loaded.rejected.len(),
        path.display()
    );

    Ok(loaded)
}

/// Decode raw file bytes. A byte-order mark, if present, wins over `encoding`.
pub fn decode(bytes: &[u8], encoding: TextEncoding) -> String {
    let (text, actual, had_errors) = encoding.encoding().decode(bytes);
    if had_errors {
        warn!(
            "Input is not valid {}; undecodable bytes were replaced",
            actual.name()
        );
    }
    text.into_owned()
}

/// Parse already-decoded export text. `source` is only used in errors.
pub fn parse_contacts(text: &str, source: &Path) -> Result<LoadedContacts> {
    let (offset, skipped_lines) = locate_header(text);
    if skipped_lines > 0 {
        debug!("Skipped {} preamble lines", skipped_lines);
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text[offset..].as_bytes());

    let raw_headers = reader.headers().map_err(|e| csv_error(source, e))?;

    if !raw_headers
        .iter()
        .any(|h| CONNECTED_ON_COLUMNS.contains(&h))
    {
        return Err(TrendError::MissingColumn {
            path: source.to_path_buf(),
            column: CONNECTED_ON_COLUMNS[0].to_string(),
        });
    }
    let headers = canonical_headers(raw_headers);

    let mut records = Vec::new();
    let mut rejected = Vec::new();
    let mut rows_read = 0usize;

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(source, e))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        rows_read += 1;

        let line = record
            .position()
            .map(|p| p.line() + skipped_lines as u64)
            .unwrap_or(0);

        let row: RawContactRow = record
            .deserialize(Some(&headers))
            .map_err(|e| csv_error(source, e))?;

        match row.into_record() {
            Ok(contact) => records.push(contact),
            Err(value) => {
                debug!("Dropping row on line {}: unparseable date \"{}\"", line, value);
                rejected.push(TrendError::DateParse { line, value });
            }
        }
    }

    Ok(LoadedContacts {
        records,
        rejected,
        rows_read,
    })
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// One data row, read against [`canonical_headers`]. Unknown columns are
/// ignored.
#[derive(Debug, Deserialize)]
struct RawContactRow {
    #[serde(rename = "First Name", default)]
    first_name: Option<String>,
    #[serde(rename = "Last Name", default)]
    last_name: Option<String>,
    #[serde(rename = "Connected On", default)]
    connected_on: Option<String>,
}

impl RawContactRow {
    /// Convert into a record, or return the offending date text.
    fn into_record(self) -> std::result::Result<ContactRecord, String> {
        let raw_date = self.connected_on.unwrap_or_default();
        let date = ConnectionDateParser::parse(&raw_date).ok_or(raw_date)?;
        Ok(ContactRecord::new(
            self.first_name.as_deref(),
            self.last_name.as_deref(),
            date,
        ))
    }
}

/// Pick one column per field and give it the field's canonical name.
///
/// When a header names several aliases of a field, the most preferred alias
/// wins (the leftmost one if it repeats) and the others are blanked so that
/// they read as unknown columns.
fn canonical_headers(headers: &csv::StringRecord) -> csv::StringRecord {
    let chosen: Vec<Option<usize>> = COLUMN_ALIASES
        .iter()
        .map(|aliases| {
            aliases
                .iter()
                .find_map(|alias| headers.iter().position(|h| h == *alias))
        })
        .collect();

    headers
        .iter()
        .enumerate()
        .map(|(index, name)| {
            match COLUMN_ALIASES
                .iter()
                .zip(&chosen)
                .find(|(aliases, _)| aliases.contains(&name))
            {
                Some((aliases, Some(keep))) if *keep == index => aliases[0],
                Some(_) => {
                    debug!("Ignoring duplicate column \"{}\" at index {}", name, index);
                    ""
                }
                None => name,
            }
        })
        .collect()
}

/// Find the header row: the first line naming a connection-date column.
///
/// Returns `(byte offset, lines skipped)`; `(0, 0)` when no line matches so
/// that the missing-column error reports against the real first line.
fn locate_header(text: &str) -> (usize, usize) {
    let mut offset = 0usize;
    for (index, line) in text.split_inclusive('\n').enumerate() {
        let names_date_column = line
            .split(',')
            .map(|cell| cell.trim().trim_matches('"').trim())
            .any(|cell| CONNECTED_ON_COLUMNS.contains(&cell));
        if names_date_column {
            return (offset, index);
        }
        offset += line.len();
    }
    (0, 0)
}

fn csv_error(path: &Path, source: csv::Error) -> TrendError {
    TrendError::Csv {
        path: PathBuf::from(path),
        source,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
