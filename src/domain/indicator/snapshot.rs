//! Per-bar indicator snapshots.
//!
//! [`compute_snapshots`] turns a price series into one [`IndicatorSnapshot`]
//! per bar. Every derived field is an `Option<f64>`: `None` means the
//! trailing window was not fully available or the computation degenerated
//! (zero divisor, non-finite input). The input series is never mutated.

use crate::domain::indicator::{finite, ichimoku, ma, oscillator, Column};
use crate::domain::series::PriceSeries;
use chrono::NaiveDate;

/// SMA/EMA periods carried on every snapshot.
pub const MA_PERIODS: [usize; 8] = [5, 10, 13, 20, 30, 50, 100, 200];

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub high: f64,
    pub low: f64,

    pub sma_5: Option<f64>,
    pub sma_10: Option<f64>,
    pub sma_13: Option<f64>,
    pub sma_20: Option<f64>,
    pub sma_30: Option<f64>,
    pub sma_50: Option<f64>,
    pub sma_100: Option<f64>,
    pub sma_200: Option<f64>,

    pub ema_5: Option<f64>,
    pub ema_10: Option<f64>,
    pub ema_13: Option<f64>,
    pub ema_20: Option<f64>,
    pub ema_30: Option<f64>,
    pub ema_50: Option<f64>,
    pub ema_100: Option<f64>,
    pub ema_200: Option<f64>,

    pub vwma_20: Option<f64>,
    pub hull_9: Option<f64>,

    pub ichimoku_conversion: Option<f64>,
    pub ichimoku_base: Option<f64>,
    pub ichimoku_span_a: Option<f64>,
    pub ichimoku_span_b: Option<f64>,

    pub rsi_14: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub cci_20: Option<f64>,
    pub adx_14: Option<f64>,
    pub di_plus: Option<f64>,
    pub di_minus: Option<f64>,
    pub awesome: Option<f64>,
    pub momentum_10: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub stochrsi_k: Option<f64>,
    pub stochrsi_d: Option<f64>,
    pub williams_r: Option<f64>,
    pub ultimate: Option<f64>,
    pub bull_power: Option<f64>,
    pub bear_power: Option<f64>,

    pub close_vs_ma5: Option<f64>,
    pub close_vs_ma10: Option<f64>,
    pub close_vs_ma20: Option<f64>,
    pub close_vs_ma50: Option<f64>,
    pub close_vs_ma200: Option<f64>,
    pub strength_st: Option<f64>,
    pub strength_lt: Option<f64>,
    pub ma50_gt_ma200: Option<bool>,
}

/// Addressable snapshot fields, used by the signal rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Close,
    Sma10,
    Sma20,
    Sma30,
    Sma50,
    Sma100,
    Sma200,
    Ema10,
    Ema13,
    Ema20,
    Ema30,
    Ema50,
    Ema100,
    Ema200,
    Vwma20,
    Hull9,
    IchimokuConversion,
    IchimokuBase,
    IchimokuSpanA,
    IchimokuSpanB,
    Rsi14,
    StochK,
    StochD,
    Cci20,
    Adx14,
    DiPlus,
    DiMinus,
    Awesome,
    Momentum10,
    Macd,
    MacdSignal,
    StochRsiK,
    StochRsiD,
    WilliamsR,
    Ultimate,
    BullPower,
    BearPower,
}

impl IndicatorSnapshot {
    /// Resolve a rule-table field against this snapshot.
    pub fn value(&self, field: Field) -> Option<f64> {
        match field {
            Field::Close => Some(self.close),
            Field::Sma10 => self.sma_10,
            Field::Sma20 => self.sma_20,
            Field::Sma30 => self.sma_30,
            Field::Sma50 => self.sma_50,
            Field::Sma100 => self.sma_100,
            Field::Sma200 => self.sma_200,
            Field::Ema10 => self.ema_10,
            Field::Ema13 => self.ema_13,
            Field::Ema20 => self.ema_20,
            Field::Ema30 => self.ema_30,
            Field::Ema50 => self.ema_50,
            Field::Ema100 => self.ema_100,
            Field::Ema200 => self.ema_200,
            Field::Vwma20 => self.vwma_20,
            Field::Hull9 => self.hull_9,
            Field::IchimokuConversion => self.ichimoku_conversion,
            Field::IchimokuBase => self.ichimoku_base,
            Field::IchimokuSpanA => self.ichimoku_span_a,
            Field::IchimokuSpanB => self.ichimoku_span_b,
            Field::Rsi14 => self.rsi_14,
            Field::StochK => self.stoch_k,
            Field::StochD => self.stoch_d,
            Field::Cci20 => self.cci_20,
            Field::Adx14 => self.adx_14,
            Field::DiPlus => self.di_plus,
            Field::DiMinus => self.di_minus,
            Field::Awesome => self.awesome,
            Field::Momentum10 => self.momentum_10,
            Field::Macd => self.macd,
            Field::MacdSignal => self.macd_signal,
            Field::StochRsiK => self.stochrsi_k,
            Field::StochRsiD => self.stochrsi_d,
            Field::WilliamsR => self.williams_r,
            Field::Ultimate => self.ultimate,
            Field::BullPower => self.bull_power,
            Field::BearPower => self.bear_power,
        }
    }
}

/// Percent deviation of close from a moving-average line.
fn deviation(close: f64, line: Option<f64>) -> Option<f64> {
    match line {
        Some(v) if v != 0.0 => finite((close - v) / v * 100.0),
        _ => None,
    }
}

fn mean_of(parts: &[Option<f64>]) -> Option<f64> {
    let mut sum = 0.0;
    for p in parts {
        sum += (*p)?;
    }
    finite(sum / parts.len() as f64)
}

/// Compute one snapshot per bar for the whole series.
pub fn compute_snapshots(series: &PriceSeries) -> Vec<IndicatorSnapshot> {
    let bars = series.bars();
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();

    let smas: Vec<Column> = MA_PERIODS.iter().map(|&p| ma::sma(&closes, p)).collect();
    let emas: Vec<Column> = MA_PERIODS.iter().map(|&p| ma::ema(&closes, p)).collect();
    let vwma_20 = ma::vwma(&closes, &volumes, 20);
    let hull_9 = ma::hull(&closes, 9);

    let cloud = ichimoku::compute(bars);

    let rsi_14 = oscillator::rsi(&closes, 14);
    let (stoch_k, stoch_d) = oscillator::stochastic(bars, 14, 3);
    let cci_20 = oscillator::cci(bars, 20);
    let dmi = oscillator::directional(bars, 14);
    let awesome = oscillator::awesome(bars);
    let momentum_10 = oscillator::momentum(&closes, 10);
    let (macd, macd_signal) = oscillator::macd(&closes, 12, 26, 9);
    let (stochrsi_k, stochrsi_d) = oscillator::stoch_rsi(&closes, 14, 14, 3);
    let williams_r = oscillator::williams_r(bars, 14);
    let ultimate = oscillator::ultimate(bars, 7, 14, 28);

    // positions of 5/10/20/50/200 inside MA_PERIODS
    let (p5, p10, p20, p50, p200) = (0, 1, 3, 5, 7);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            let ema_13 = emas[2][i];
            let bull_power = ema_13.and_then(|e| finite(bar.high - e));
            let bear_power = ema_13.and_then(|e| finite(bar.low - e));

            let close_vs_ma5 = deviation(bar.close, smas[p5][i]);
            let close_vs_ma10 = deviation(bar.close, smas[p10][i]);
            let close_vs_ma20 = deviation(bar.close, smas[p20][i]);
            let close_vs_ma50 = deviation(bar.close, smas[p50][i]);
            let close_vs_ma200 = deviation(bar.close, smas[p200][i]);

            let strength_st = mean_of(&[close_vs_ma5, close_vs_ma10, close_vs_ma20]);
            let strength_lt = mean_of(&[
                close_vs_ma5,
                close_vs_ma10,
                close_vs_ma20,
                close_vs_ma50,
                close_vs_ma200,
            ]);

            let ma50_gt_ma200 = match (smas[p50][i], smas[p200][i]) {
                (Some(a), Some(b)) => Some(a > b),
                _ => None,
            };

            IndicatorSnapshot {
                date: bar.date,
                close: bar.close,
                high: bar.high,
                low: bar.low,
                sma_5: smas[0][i],
                sma_10: smas[1][i],
                sma_13: smas[2][i],
                sma_20: smas[3][i],
                sma_30: smas[4][i],
                sma_50: smas[5][i],
                sma_100: smas[6][i],
                sma_200: smas[7][i],
                ema_5: emas[0][i],
                ema_10: emas[1][i],
                ema_13,
                ema_20: emas[3][i],
                ema_30: emas[4][i],
                ema_50: emas[5][i],
                ema_100: emas[6][i],
                ema_200: emas[7][i],
                vwma_20: vwma_20[i],
                hull_9: hull_9[i],
                ichimoku_conversion: cloud.conversion[i],
                ichimoku_base: cloud.base[i],
                ichimoku_span_a: cloud.span_a[i],
                ichimoku_span_b: cloud.span_b[i],
                rsi_14: rsi_14[i],
                stoch_k: stoch_k[i],
                stoch_d: stoch_d[i],
                cci_20: cci_20[i],
                adx_14: dmi.adx[i],
                di_plus: dmi.di_plus[i],
                di_minus: dmi.di_minus[i],
                awesome: awesome[i],
                momentum_10: momentum_10[i],
                macd: macd[i],
                macd_signal: macd_signal[i],
                stochrsi_k: stochrsi_k[i],
                stochrsi_d: stochrsi_d[i],
                williams_r: williams_r[i],
                ultimate: ultimate[i],
                bull_power,
                bear_power,
                close_vs_ma5,
                close_vs_ma10,
                close_vs_ma20,
                close_vs_ma50,
                close_vs_ma200,
                strength_st,
                strength_lt,
                ma50_gt_ma200,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PriceBar;
    use approx::assert_relative_eq;

    fn make_series(closes: &[f64]) -> PriceSeries {
        let bars: Vec<PriceBar> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Days::new(i as u64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000,
            })
            .collect();
        PriceSeries::new("TEST", "HOSE", bars).unwrap()
    }

    fn rising(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + i as f64 * 0.5).collect()
    }

    #[test]
    fn snapshot_count_matches_bars() {
        let series = make_series(&rising(60));
        assert_eq!(compute_snapshots(&series).len(), 60);
    }

    #[test]
    fn three_bar_series_long_fields_unavailable() {
        let series = make_series(&[100.0, 101.0, 102.0]);
        let snaps = compute_snapshots(&series);
        let last = &snaps[2];
        assert_eq!(last.sma_200, None);
        assert_eq!(last.ema_200, None);
        assert_eq!(last.rsi_14, None);
        assert_eq!(last.ichimoku_conversion, None);
        assert_eq!(last.ichimoku_span_b, None);
        assert_eq!(last.ma50_gt_ma200, None);
        // even the short SMA is still warming up
        assert_eq!(last.sma_5, None);
        assert_eq!(last.close, 102.0);
    }

    #[test]
    fn deviation_fields_match_formula() {
        let series = make_series(&rising(260));
        let snaps = compute_snapshots(&series);
        let last = snaps.last().unwrap();
        let sma50 = last.sma_50.unwrap();
        assert_relative_eq!(
            last.close_vs_ma50.unwrap(),
            (last.close - sma50) / sma50 * 100.0,
        );
        assert!(last.close_vs_ma50.unwrap() > 0.0);
        assert_eq!(last.ma50_gt_ma200, Some(true));
    }

    #[test]
    fn strength_scores_are_means() {
        let series = make_series(&rising(260));
        let last = compute_snapshots(&series).into_iter().last().unwrap();
        let st = (last.close_vs_ma5.unwrap()
            + last.close_vs_ma10.unwrap()
            + last.close_vs_ma20.unwrap())
            / 3.0;
        assert_relative_eq!(last.strength_st.unwrap(), st);
        let lt = (last.close_vs_ma5.unwrap()
            + last.close_vs_ma10.unwrap()
            + last.close_vs_ma20.unwrap()
            + last.close_vs_ma50.unwrap()
            + last.close_vs_ma200.unwrap())
            / 5.0;
        assert_relative_eq!(last.strength_lt.unwrap(), lt);
    }

    #[test]
    fn strength_lt_unavailable_without_long_history() {
        let series = make_series(&rising(60));
        let last = compute_snapshots(&series).into_iter().last().unwrap();
        assert!(last.strength_st.is_some());
        assert_eq!(last.strength_lt, None);
    }

    #[test]
    fn bull_bear_power_around_ema13() {
        let series = make_series(&rising(40));
        let last = compute_snapshots(&series).into_iter().last().unwrap();
        let e = last.ema_13.unwrap();
        assert_relative_eq!(last.bull_power.unwrap(), last.high - e);
        assert_relative_eq!(last.bear_power.unwrap(), last.low - e);
    }

    #[test]
    fn zero_price_ma_deviation_unavailable() {
        // all-zero closes make the SMA zero; the deviation must not divide
        let series = make_series(&[0.0; 30]);
        let last = compute_snapshots(&series).into_iter().last().unwrap();
        assert_eq!(last.close_vs_ma5, None);
        assert_eq!(last.strength_st, None);
    }

    #[test]
    fn field_accessor_roundtrip() {
        let series = make_series(&rising(260));
        let last = compute_snapshots(&series).into_iter().last().unwrap();
        assert_eq!(last.value(Field::Close), Some(last.close));
        assert_eq!(last.value(Field::Sma50), last.sma_50);
        assert_eq!(last.value(Field::Rsi14), last.rsi_14);
        assert_eq!(last.value(Field::BearPower), last.bear_power);
    }
}
