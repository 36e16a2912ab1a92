//! Data layer for connections-trend.
//!
//! Reads a contacts export, splits it around the trailing window and builds
//! the daily or monthly series the chart draws.

pub mod aggregator;
pub mod analysis;
pub mod filter;
pub mod reader;

pub use trend_core as core;
