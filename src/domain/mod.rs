//! Core screening logic: price series, indicators, signals, ratings.

pub mod error;
pub mod indicator;
pub mod rating;
pub mod screener;
pub mod series;
pub mod signal;
pub mod signal_eval;
