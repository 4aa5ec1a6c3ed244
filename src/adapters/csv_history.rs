//! CSV price history adapter.
//!
//! One file per listing, named `<TICKER>_<EXCHANGE>.csv`, columns
//! `date,open,high,low,close,volume` with ISO dates. Rows may arrive in any
//! order; series validation happens in the domain constructor.

use crate::domain::error::ScreenError;
use crate::domain::series::{PriceBar, PriceSeries};
use crate::ports::history_port::HistoryPort;
use chrono::NaiveDate;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

pub struct CsvHistoryAdapter {
    base_path: PathBuf,
}

impl CsvHistoryAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str, exchange: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", ticker, exchange))
    }

    fn read_bars(&self, ticker: &str, exchange: &str) -> Result<Vec<PriceBar>, ScreenError> {
        let path = self.csv_path(ticker, exchange);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ScreenError::NoData {
                    ticker: ticker.to_string(),
                    exchange: exchange.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let malformed = |reason: String| ScreenError::MalformedSeries {
            ticker: ticker.to_string(),
            reason,
        };

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| malformed(format!("CSV parse error: {}", e)))?;

            let field = |idx: usize, name: &str| {
                record
                    .get(idx)
                    .ok_or_else(|| malformed(format!("missing {} column", name)))
            };

            let date = NaiveDate::parse_from_str(field(0, "date")?, "%Y-%m-%d")
                .map_err(|e| malformed(format!("invalid date: {}", e)))?;
            let open: f64 = field(1, "open")?
                .parse()
                .map_err(|e| malformed(format!("invalid open value: {}", e)))?;
            let high: f64 = field(2, "high")?
                .parse()
                .map_err(|e| malformed(format!("invalid high value: {}", e)))?;
            let low: f64 = field(3, "low")?
                .parse()
                .map_err(|e| malformed(format!("invalid low value: {}", e)))?;
            let close: f64 = field(4, "close")?
                .parse()
                .map_err(|e| malformed(format!("invalid close value: {}", e)))?;
            let volume: i64 = field(5, "volume")?
                .parse()
                .map_err(|e| malformed(format!("invalid volume value: {}", e)))?;

            bars.push(PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        bars.dedup_by_key(|b| b.date);
        Ok(bars)
    }
}

impl HistoryPort for CsvHistoryAdapter {
    fn fetch_history(
        &self,
        ticker: &str,
        exchange: &str,
        end: NaiveDate,
    ) -> Result<PriceSeries, ScreenError> {
        let mut bars = self.read_bars(ticker, exchange)?;
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
        exchange: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, ScreenError> {
        match self.read_bars(ticker, exchange) {
            Ok(bars) if bars.is_empty() => Ok(None),
            Ok(bars) => Ok(Some((
                bars[0].date,
                bars[bars.len() - 1].date,
                bars.len(),
            ))),
            Err(ScreenError::NoData { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
