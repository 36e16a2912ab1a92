//! Shared foundation for the connections trend tools.
//!
//! Holds the contact and series data model, the error taxonomy, command-line
//! settings, the trailing time window, connection-date parsing and the
//! number/period formatting used by the chart.

pub mod dates;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{Result, TrendError};
