//! Per-ticker analysis pipeline and the parallel screening batch.
//!
//! One ticker's run is a strict sequence: snapshots → signal evaluation →
//! family tallies → ratings. Tickers are independent, so the batch fans out
//! over rayon with no ordering requirement; output order still matches the
//! watchlist. A ticker failing anywhere degrades to an unavailable row and
//! never takes the batch down with it.

use crate::domain::error::ScreenError;
use crate::domain::indicator::{compute_snapshots, IndicatorSnapshot};
use crate::domain::rating::{percent_change, RatingScore, SignalCounts};
use crate::domain::series::PriceSeries;
use crate::domain::signal::SignalSet;
use crate::domain::signal_eval::evaluate;
use crate::ports::history_port::HistoryPort;
use chrono::NaiveDate;
use rayon::prelude::*;

/// One watchlist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchItem {
    pub ticker: String,
    pub sector: String,
    pub exchange: String,
}

/// One fully evaluated result row.
#[derive(Debug, Clone)]
pub struct TickerReport {
    pub ticker: String,
    pub sector: String,
    pub exchange: String,
    /// The requested evaluation date.
    pub as_of: NaiveDate,
    /// The bar the evaluation resolved to (last bar at or before `as_of`).
    pub bar_date: Option<NaiveDate>,
    pub price: Option<f64>,
    pub percent_change: Option<f64>,
    pub counts: SignalCounts,
    pub rating: RatingScore,
    /// Ratings for the one and two bars before the evaluation bar, produced
    /// by replaying the evaluator on those bars' snapshot pairs. Recomputing
    /// instead of caching keeps them bit-identical to what they were when
    /// those days were "today".
    pub rating_prev1: Option<RatingScore>,
    pub rating_prev2: Option<RatingScore>,
    pub signals: SignalSet,
    pub snapshot: Option<IndicatorSnapshot>,
    /// The previous bar's snapshot; its fields are the `*_Prev` inputs the
    /// direction rules consumed.
    pub previous: Option<IndicatorSnapshot>,
}

impl TickerReport {
    /// The row shape for a ticker whose data could not be used: every
    /// verdict unavailable, tallied as such, ratings at the neutral
    /// midpoint. Counts still partition all 26 signals.
    pub fn unavailable(item: &WatchItem, as_of: NaiveDate) -> Self {
        let signals = SignalSet::all_unavailable();
        let counts = SignalCounts::tally(&signals);
        Self {
            ticker: item.ticker.clone(),
            sector: item.sector.clone(),
            exchange: item.exchange.clone(),
            as_of,
            bar_date: None,
            price: None,
            percent_change: None,
            counts,
            rating: RatingScore::from_counts(&counts),
            rating_prev1: None,
            rating_prev2: None,
            signals,
            snapshot: None,
            previous: None,
        }
    }
}

fn rating_at(snapshots: &[IndicatorSnapshot], index: usize) -> RatingScore {
    let previous = index.checked_sub(1).map(|i| &snapshots[i]);
    let signals = evaluate(&snapshots[index], previous);
    RatingScore::from_counts(&SignalCounts::tally(&signals))
}

/// Run the full pipeline for one series at one evaluation date.
///
/// Fails only when the series starts after `as_of`; short history degrades
/// per-field inside the snapshots instead.
pub fn analyze_series(
    item: &WatchItem,
    series: &PriceSeries,
    as_of: NaiveDate,
) -> Result<TickerReport, ScreenError> {
    let index = series
        .index_at_or_before(as_of)
        .ok_or(ScreenError::DateOutOfRange {
            requested: as_of,
            first: series.first_date(),
        })?;

    let snapshots = compute_snapshots(series);
    let current = snapshots[index].clone();
    let previous = index.checked_sub(1).map(|i| snapshots[i].clone());

    let signals = evaluate(&current, previous.as_ref());
    let counts = SignalCounts::tally(&signals);
    let rating = RatingScore::from_counts(&counts);
    let rating_prev1 = index.checked_sub(1).map(|i| rating_at(&snapshots, i));
    let rating_prev2 = index.checked_sub(2).map(|i| rating_at(&snapshots, i));

    let change = previous
        .as_ref()
        .and_then(|p| percent_change(current.close, p.close));

    Ok(TickerReport {
        ticker: item.ticker.clone(),
        sector: item.sector.clone(),
        exchange: item.exchange.clone(),
        as_of,
        bar_date: Some(current.date),
        price: Some(current.close),
        percent_change: change,
        counts,
        rating,
        rating_prev1,
        rating_prev2,
        signals,
        snapshot: Some(current),
        previous,
    })
}

/// Screen a whole watchlist in parallel. One report per item, in watchlist
/// order; failures are logged and become unavailable rows.
pub fn screen<P: HistoryPort + Sync>(
    port: &P,
    items: &[WatchItem],
    as_of: NaiveDate,
) -> Vec<TickerReport> {
    items
        .par_iter()
        .map(|item| match port.fetch_history(&item.ticker, &item.exchange, as_of) {
            Ok(series) => analyze_series(item, &series, as_of).unwrap_or_else(|e| {
                log::warn!("{}.{}: {}", item.ticker, item.exchange, e);
                TickerReport::unavailable(item, as_of)
            }),
            Err(e) => {
                log::warn!("{}.{}: {}", item.ticker, item.exchange, e);
                TickerReport::unavailable(item, as_of)
            }
        })
        .collect()
}
