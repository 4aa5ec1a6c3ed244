//! Concrete adapter implementations of the port traits.

pub mod csv_history;
pub mod csv_report;
pub mod ini_config;
pub mod watchlist;
