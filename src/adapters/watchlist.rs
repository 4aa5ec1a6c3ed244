//! Watchlist CSV loader.
//!
//! Columns `ticker,sector,exchange`; header row required. Blank tickers are
//! skipped, ticker and exchange are uppercased.

use crate::domain::error::ScreenError;
use crate::domain::screener::WatchItem;
use std::fs;
use std::path::Path;

pub fn load_watchlist(
    path: &Path,
    exchange_filter: Option<&str>,
) -> Result<Vec<WatchItem>, ScreenError> {
    let content = fs::read_to_string(path)?;
    parse_watchlist(&content, &path.display().to_string(), exchange_filter)
}

fn parse_watchlist(
    content: &str,
    file: &str,
    exchange_filter: Option<&str>,
) -> Result<Vec<WatchItem>, ScreenError> {
    let parse_err = |reason: String| ScreenError::ConfigParse {
        file: file.to_string(),
        reason,
    };

    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut items = Vec::new();

    for result in rdr.records() {
        let record = result.map_err(|e| parse_err(format!("CSV parse error: {}", e)))?;

        let ticker = record
            .get(0)
            .ok_or_else(|| parse_err("missing ticker column".into()))?
            .trim()
            .to_uppercase();
        if ticker.is_empty() {
            continue;
        }

        let sector = record.get(1).unwrap_or("").trim().to_string();
        let exchange = record
            .get(2)
            .ok_or_else(|| parse_err("missing exchange column".into()))?
            .trim()
            .to_uppercase();

        if let Some(wanted) = exchange_filter {
            if !exchange.eq_ignore_ascii_case(wanted) {
                continue;
            }
        }

        items.push(WatchItem {
            ticker,
            sector,
            exchange,
        });
    }

    Ok(items)
}
