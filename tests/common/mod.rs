#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use tascreen::domain::error::ScreenError;
use tascreen::domain::screener::WatchItem;
pub use tascreen::domain::series::{PriceBar, PriceSeries};
use tascreen::ports::history_port::HistoryPort;

pub struct MockHistoryPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockHistoryPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl HistoryPort for MockHistoryPort {
    fn fetch_history(
        &self,
        ticker: &str,
        exchange: &str,
        end: NaiveDate,
    ) -> Result<PriceSeries, ScreenError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(ScreenError::MalformedSeries {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        let mut bars = self.data.get(ticker).cloned().unwrap_or_default();
        bars.retain(|b| b.date <= end);
        if bars.is_empty() {
            return Err(ScreenError::NoData {
                ticker: ticker.to_string(),
                exchange: exchange.to_string(),
            });
        }
        PriceSeries::new(ticker, exchange, bars)
    }

    fn data_range(
        &self,
        ticker: &str,
        _exchange: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ScreenError> {
        match self.data.get(ticker) {
            Some(bars) if !bars.is_empty() => Ok(Some((
                bars[0].date,
                bars[bars.len() - 1].date,
                bars.len(),
            ))),
            _ => Ok(None),
        }
    }
}

pub fn make_bar(date: &str, close: f64) -> PriceBar {
    PriceBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// Daily bars starting 2023-01-01, one close per element.
pub fn make_series(closes: &[f64]) -> Vec<PriceBar> {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: start + chrono::Days::new(i as u64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000 + i as i64,
        })
        .collect()
}

pub fn watch(ticker: &str) -> WatchItem {
    WatchItem {
        ticker: ticker.to_string(),
        sector: "Industrials".to_string(),
        exchange: "HOSE".to_string(),
    }
}
