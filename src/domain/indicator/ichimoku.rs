//! Ichimoku lines (9/26/52 with 26-bar displacement).

use crate::domain::indicator::{rolling_max, rolling_min, shift_forward, Column};
use crate::domain::series::PriceBar;

pub const CONVERSION_PERIOD: usize = 9;
pub const BASE_PERIOD: usize = 26;
pub const SPAN_B_PERIOD: usize = 52;
pub const DISPLACEMENT: usize = 26;

pub struct IchimokuColumns {
    pub conversion: Column,
    pub base: Column,
    pub span_a: Column,
    pub span_b: Column,
}

/// High/low midpoint over the trailing window.
fn midpoint(highs: &[f64], lows: &[f64], period: usize) -> Column {
    rolling_max(highs, period)
        .into_iter()
        .zip(rolling_min(lows, period))
        .map(|(h, l)| match (h, l) {
            (Some(h), Some(l)) => Some((h + l) / 2.0),
            _ => None,
        })
        .collect()
}

/// Conversion/base are as-of lines; spans A and B are projected forward
/// [`DISPLACEMENT`] bars, so the value at bar `i` was computed from the
/// window ending at `i - 26`.
pub fn compute(bars: &[PriceBar]) -> IchimokuColumns {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

    let conversion = midpoint(&highs, &lows, CONVERSION_PERIOD);
    let base = midpoint(&highs, &lows, BASE_PERIOD);

    let span_a_raw: Column = conversion
        .iter()
        .zip(&base)
        .map(|(c, b)| match (c, b) {
            (Some(c), Some(b)) => Some((c + b) / 2.0),
            _ => None,
        })
        .collect();
    let span_a = shift_forward(&span_a_raw, DISPLACEMENT);
    let span_b = shift_forward(&midpoint(&highs, &lows, SPAN_B_PERIOD), DISPLACEMENT);

    IchimokuColumns {
        conversion,
        base,
        span_a,
        span_b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(n: usize) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let close = 100.0 + i as f64;
                PriceBar {
                    date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap()
                        + chrono::Days::new(i as u64),
                    open: close,
                    high: close + 2.0,
                    low: close - 2.0,
                    close,
                    volume: 1000,
                }
            })
            .collect()
    }

    #[test]
    fn conversion_line_is_nine_bar_midpoint() {
        let bars = make_bars(20);
        let cols = compute(&bars);
        assert_eq!(cols.conversion[7], None);
        // window 0..=8: highest high = 110, lowest low = 98
        assert_relative_eq!(cols.conversion[8].unwrap(), (110.0 + 98.0) / 2.0);
    }

    #[test]
    fn base_line_warmup() {
        let bars = make_bars(30);
        let cols = compute(&bars);
        assert_eq!(cols.base[24], None);
        assert!(cols.base[25].is_some());
    }

    #[test]
    fn span_a_displaced_forward() {
        let bars = make_bars(60);
        let cols = compute(&bars);
        // base valid from 25, so raw span A from 25; displaced → 51.
        assert_eq!(cols.span_a[50], None);
        assert!(cols.span_a[51].is_some());
        // value at 51 comes from the window ending at 25
        let conv_25 = ((100.0 + 25.0 + 2.0) + (100.0 + 17.0 - 2.0)) / 2.0;
        let base_25 = ((100.0 + 25.0 + 2.0) + (100.0 - 2.0)) / 2.0;
        assert_relative_eq!(cols.span_a[51].unwrap(), (conv_25 + base_25) / 2.0);
    }

    #[test]
    fn span_b_needs_fifty_two_plus_displacement() {
        let bars = make_bars(80);
        let cols = compute(&bars);
        assert_eq!(cols.span_b[76], None);
        assert!(cols.span_b[77].is_some());
    }

    #[test]
    fn short_series_all_unavailable() {
        let bars = make_bars(3);
        let cols = compute(&bars);
        assert!(cols.conversion.iter().all(Option::is_none));
        assert!(cols.span_b.iter().all(Option::is_none));
    }
}
