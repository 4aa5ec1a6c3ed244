//! Daily OHLCV bars and the validated price series they live in.

use crate::domain::error::ScreenError;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl PriceBar {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// (high + low) / 2
    pub fn median_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Ordered daily history for one instrument.
///
/// Construction goes through [`PriceSeries::new`], which rejects malformed
/// input up front: non-ascending or duplicate dates, non-finite OHLC values,
/// negative volume. Everything downstream may assume the invariants hold.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    ticker: String,
    exchange: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(
        ticker: impl Into<String>,
        exchange: impl Into<String>,
        bars: Vec<PriceBar>,
    ) -> Result<Self, ScreenError> {
        let ticker = ticker.into();
        let exchange = exchange.into();

        if bars.is_empty() {
            return Err(ScreenError::NoData { ticker, exchange });
        }

        for (i, bar) in bars.iter().enumerate() {
            let finite =
                [bar.open, bar.high, bar.low, bar.close].iter().all(|v| v.is_finite());
            if !finite {
                return Err(ScreenError::MalformedSeries {
                    ticker,
                    reason: format!("non-finite price on {}", bar.date),
                });
            }
            if bar.volume < 0 {
                return Err(ScreenError::MalformedSeries {
                    ticker,
                    reason: format!("negative volume on {}", bar.date),
                });
            }
            if i > 0 && bar.date <= bars[i - 1].date {
                return Err(ScreenError::MalformedSeries {
                    ticker,
                    reason: format!(
                        "dates not strictly ascending at {} (previous {})",
                        bar.date,
                        bars[i - 1].date
                    ),
                });
            }
        }

        Ok(Self {
            ticker,
            exchange,
            bars,
        })
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }

    /// Index of the last bar dated at or before `date`.
    ///
    /// `None` when the series starts after the requested date. A request for
    /// a non-trading day resolves to the preceding bar.
    pub fn index_at_or_before(&self, date: NaiveDate) -> Option<usize> {
        match self.bars.partition_point(|b| b.date <= date) {
            0 => None,
            n => Some(n - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, close: f64) -> PriceBar {
        PriceBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        }
    }

    #[test]
    fn typical_and_median_price() {
        let b = PriceBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 50_000,
        };
        assert!((b.typical_price() - (110.0 + 90.0 + 105.0) / 3.0).abs() < f64::EPSILON);
        assert!((b.median_price() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let b = bar("2024-01-02", 100.0);
        // high-low=2, |101-90|=11, |99-90|=9 → 11
        assert!((b.true_range(90.0) - 11.0).abs() < f64::EPSILON);
    }

    #[test]
    fn new_rejects_empty() {
        let err = PriceSeries::new("VNM", "HOSE", vec![]).unwrap_err();
        assert!(matches!(err, ScreenError::NoData { .. }));
    }

    #[test]
    fn new_rejects_duplicate_date() {
        let bars = vec![bar("2024-01-02", 100.0), bar("2024-01-02", 101.0)];
        let err = PriceSeries::new("VNM", "HOSE", bars).unwrap_err();
        assert!(matches!(err, ScreenError::MalformedSeries { .. }));
    }

    #[test]
    fn new_rejects_descending_dates() {
        let bars = vec![bar("2024-01-03", 100.0), bar("2024-01-02", 101.0)];
        assert!(PriceSeries::new("VNM", "HOSE", bars).is_err());
    }

    #[test]
    fn new_rejects_nan_price() {
        let mut b = bar("2024-01-02", 100.0);
        b.close = f64::NAN;
        assert!(PriceSeries::new("VNM", "HOSE", vec![b]).is_err());
    }

    #[test]
    fn index_at_or_before() {
        let bars = vec![
            bar("2024-01-02", 100.0),
            bar("2024-01-03", 101.0),
            bar("2024-01-05", 102.0),
        ];
        let series = PriceSeries::new("VNM", "HOSE", bars).unwrap();

        let d = |s| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert_eq!(series.index_at_or_before(d("2024-01-01")), None);
        assert_eq!(series.index_at_or_before(d("2024-01-02")), Some(0));
        // weekend gap resolves backwards
        assert_eq!(series.index_at_or_before(d("2024-01-04")), Some(1));
        assert_eq!(series.index_at_or_before(d("2024-01-09")), Some(2));
    }
}
