//! Terminal chart layer for connections-trend.
//!
//! Draws an aggregate series as a line chart with [`ratatui`], either on the
//! alternate screen ([`app::App`]) or off-screen as a text snapshot.

pub mod app;
pub mod chart;
pub mod themes;

pub use trend_core as core;
