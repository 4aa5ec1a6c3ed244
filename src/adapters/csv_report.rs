//! CSV report adapter.
//!
//! Flat export of a screening batch: one row per watchlist entry, in
//! watchlist order. Unavailable values are written as empty cells so the
//! file loads cleanly into spreadsheet tools.

use crate::domain::error::ScreenError;
use crate::domain::indicator::{Field, IndicatorSnapshot};
use crate::domain::screener::TickerReport;
use crate::domain::signal::rule_table;
use crate::ports::report_port::ReportPort;

/// Indicator columns exported twice, once for the evaluation bar and once
/// for the previous bar.
const INDICATOR_COLUMNS: &[(&str, Field)] = &[
    ("RSI14", Field::Rsi14),
    ("Stoch %K", Field::StochK),
    ("Stoch %D", Field::StochD),
    ("CCI20", Field::Cci20),
    ("ADX14", Field::Adx14),
    ("+DI14", Field::DiPlus),
    ("-DI14", Field::DiMinus),
    ("AO", Field::Awesome),
    ("Momentum10", Field::Momentum10),
    ("MACD", Field::Macd),
    ("MACD Signal", Field::MacdSignal),
    ("StochRSI %K", Field::StochRsiK),
    ("StochRSI %D", Field::StochRsiD),
    ("Williams %R", Field::WilliamsR),
    ("UO", Field::Ultimate),
    ("Bull Power", Field::BullPower),
    ("Bear Power", Field::BearPower),
    ("SMA10", Field::Sma10),
    ("SMA20", Field::Sma20),
    ("SMA30", Field::Sma30),
    ("SMA50", Field::Sma50),
    ("SMA100", Field::Sma100),
    ("SMA200", Field::Sma200),
    ("EMA10", Field::Ema10),
    ("EMA13", Field::Ema13),
    ("EMA20", Field::Ema20),
    ("EMA30", Field::Ema30),
    ("EMA50", Field::Ema50),
    ("EMA100", Field::Ema100),
    ("EMA200", Field::Ema200),
    ("VWMA20", Field::Vwma20),
    ("HullMA9", Field::Hull9),
    ("Ichimoku Conversion", Field::IchimokuConversion),
    ("Ichimoku Base", Field::IchimokuBase),
    ("Ichimoku Span A", Field::IchimokuSpanA),
    ("Ichimoku Span B", Field::IchimokuSpanB),
];

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_default()
}

fn snapshot_cell(snapshot: Option<&IndicatorSnapshot>, field: Field) -> String {
    opt_cell(snapshot.and_then(|s| s.value(field)))
}

fn rating_cell(rating: Option<f64>) -> String {
    rating.map(|v| format!("{:.2}", v)).unwrap_or_default()
}

fn headers() -> Vec<String> {
    let mut h: Vec<String> = [
        "Ticker",
        "Sector",
        "Exchange",
        "Date",
        "Price",
        "Change %",
        "Osc Buy",
        "Osc Sell",
        "Osc Neutral",
        "MA Buy",
        "MA Sell",
        "MA Neutral",
        "Osc Rating",
        "MA Rating",
        "Osc Rating -1",
        "MA Rating -1",
        "Osc Rating -2",
        "MA Rating -2",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for spec in rule_table() {
        h.push(spec.name.to_string());
    }
    for (name, _) in INDICATOR_COLUMNS {
        h.push(name.to_string());
    }
    for (name, _) in INDICATOR_COLUMNS {
        h.push(format!("{} Prev", name));
    }
    h.push("Strength ST".into());
    h.push("Strength LT".into());
    h.push("MA50 > MA200".into());
    h
}

fn row(report: &TickerReport) -> Vec<String> {
    let snap = report.snapshot.as_ref();
    let prev = report.previous.as_ref();

    let mut r = vec![
        report.ticker.clone(),
        report.sector.clone(),
        report.exchange.clone(),
        report
            .bar_date
            .map(|d| d.to_string())
            .unwrap_or_default(),
        rating_cell(report.price),
        rating_cell(report.percent_change),
        report.counts.oscillator.buy.to_string(),
        report.counts.oscillator.sell.to_string(),
        report.counts.oscillator.neutral.to_string(),
        report.counts.moving_average.buy.to_string(),
        report.counts.moving_average.sell.to_string(),
        report.counts.moving_average.neutral.to_string(),
        rating_cell(Some(report.rating.oscillator)),
        rating_cell(Some(report.rating.moving_average)),
        rating_cell(report.rating_prev1.map(|r| r.oscillator)),
        rating_cell(report.rating_prev1.map(|r| r.moving_average)),
        rating_cell(report.rating_prev2.map(|r| r.oscillator)),
        rating_cell(report.rating_prev2.map(|r| r.moving_average)),
    ];

    for (_, verdict) in report.signals.iter() {
        r.push(verdict.to_string());
    }
    for &(_, field) in INDICATOR_COLUMNS {
        r.push(snapshot_cell(snap, field));
    }
    for &(_, field) in INDICATOR_COLUMNS {
        r.push(snapshot_cell(prev, field));
    }
    r.push(opt_cell(snap.and_then(|s| s.strength_st)));
    r.push(opt_cell(snap.and_then(|s| s.strength_lt)));
    r.push(
        snap.and_then(|s| s.ma50_gt_ma200)
            .map(|b| b.to_string())
            .unwrap_or_default(),
    );
    r
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, reports: &[TickerReport], output_path: &str) -> Result<(), ScreenError> {
        let mut wtr = csv::Writer::from_path(output_path)
            .map_err(|e| ScreenError::Io(std::io::Error::other(e)))?;

        wtr.write_record(headers())
            .map_err(|e| ScreenError::Io(std::io::Error::other(e)))?;
        for report in reports {
            wtr.write_record(row(report))
                .map_err(|e| ScreenError::Io(std::io::Error::other(e)))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::screener::WatchItem;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn header_and_row_widths_agree() {
        let item = WatchItem {
            ticker: "VNM".into(),
            sector: "Food".into(),
            exchange: "HOSE".into(),
        };
        let report =
            TickerReport::unavailable(&item, NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        assert_eq!(headers().len(), row(&report).len());
    }

    #[test]
    fn writes_unavailable_row_with_empty_cells() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.csv");

        let item = WatchItem {
            ticker: "GONE".into(),
            sector: "".into(),
            exchange: "HNX".into(),
        };
        let report =
            TickerReport::unavailable(&item, NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());

        CsvReportAdapter::new()
            .write(&[report], path.to_str().unwrap())
            .unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        let header = lines.next().unwrap();
        let data = lines.next().unwrap();
        assert!(header.starts_with("Ticker,Sector,Exchange"));
        assert!(header.contains("RSI14 Prev"));
        assert!(data.starts_with("GONE,,HNX,,"));
        assert!(data.contains("N/A"));
    }
}
