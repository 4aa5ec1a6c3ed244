//! Oscillators and trend-strength indicators.
//!
//! Conventions: columns are aligned with the input bars; warmup bars and
//! degenerate windows (flat range, zero divisor) are `None`. Smoothed
//! indicators follow Wilder or SMA-seeded-EMA recurrences as their canonical
//! definitions require, since the signal thresholds are tuned to them.

use crate::domain::indicator::{
    ema_over, finite, max_over, min_over, rolling_max, rolling_min, sma_over, wilder_over, Column,
};
use crate::domain::indicator::ma::{ema, sma};
use crate::domain::series::PriceBar;

/// RSI with Wilder smoothing. Seed averages cover the first `period` price
/// changes; RSI is 100 when the average loss is zero.
pub fn rsi(closes: &[f64], period: usize) -> Column {
    let n = closes.len();
    let mut out = vec![None; n];
    if period == 0 || n < period + 1 {
        return out;
    }

    let mut sum_gain = 0.0;
    let mut sum_loss = 0.0;
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for i in 1..n {
        let change = closes[i] - closes[i - 1];
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i < period {
            sum_gain += gain;
            sum_loss += loss;
        } else if i == period {
            sum_gain += gain;
            sum_loss += loss;
            avg_gain = sum_gain / period as f64;
            avg_loss = sum_loss / period as f64;
            out[i] = rsi_value(avg_gain, avg_loss);
        } else {
            avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
            out[i] = rsi_value(avg_gain, avg_loss);
        }
    }
    out
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        Some(100.0)
    } else {
        finite(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
    }
}

/// Stochastic %K/%D: raw %K = 100*(close-LL)/(HH-LL), %K = SMA(smooth) of
/// raw, %D = SMA(smooth) of %K. Flat windows (HH == LL) are unavailable.
pub fn stochastic(bars: &[PriceBar], period: usize, smooth: usize) -> (Column, Column) {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();

    let hh = rolling_max(&highs, period);
    let ll = rolling_min(&lows, period);

    let raw: Column = bars
        .iter()
        .enumerate()
        .map(|(i, b)| match (hh[i], ll[i]) {
            (Some(h), Some(l)) if h > l => finite(100.0 * (b.close - l) / (h - l)),
            _ => None,
        })
        .collect();

    let k = sma_over(&raw, smooth);
    let d = sma_over(&k, smooth);
    (k, d)
}

/// CCI: (tp - SMA(tp)) / (0.015 * mean absolute deviation).
pub fn cci(bars: &[PriceBar], period: usize) -> Column {
    let tp: Vec<f64> = bars.iter().map(|b| b.typical_price()).collect();
    let tp_sma = sma(&tp, period);

    let mut out = vec![None; bars.len()];
    for i in 0..bars.len() {
        let Some(mean) = tp_sma[i] else { continue };
        let window = &tp[i + 1 - period..=i];
        let mad = window.iter().map(|v| (v - mean).abs()).sum::<f64>() / period as f64;
        let denom = 0.015 * mad;
        if denom > 0.0 {
            out[i] = finite((tp[i] - mean) / denom);
        }
    }
    out
}

pub struct DirectionalColumns {
    pub di_plus: Column,
    pub di_minus: Column,
    pub adx: Column,
}

/// Wilder's directional movement system.
///
/// +DM/−DM and TR are Wilder-smoothed with an SMA seed; DI = 100*DM/TR;
/// DX = 100*|+DI − −DI| / (+DI + −DI); ADX = Wilder average of DX. DI
/// becomes available after `period` changes, ADX after roughly twice that.
pub fn directional(bars: &[PriceBar], period: usize) -> DirectionalColumns {
    let n = bars.len();
    let empty = DirectionalColumns {
        di_plus: vec![None; n],
        di_minus: vec![None; n],
        adx: vec![None; n],
    };
    if period == 0 || n < period + 1 {
        return empty;
    }

    let mut tr = vec![0.0; n];
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];
    for i in 1..n {
        tr[i] = bars[i].true_range(bars[i - 1].close);
        let up = bars[i].high - bars[i - 1].high;
        let down = bars[i - 1].low - bars[i].low;
        if up > down && up > 0.0 {
            plus_dm[i] = up;
        }
        if down > up && down > 0.0 {
            minus_dm[i] = down;
        }
    }

    let mut di_plus: Column = vec![None; n];
    let mut di_minus: Column = vec![None; n];
    let mut dx: Column = vec![None; n];

    let mut sm_tr = 0.0;
    let mut sm_plus = 0.0;
    let mut sm_minus = 0.0;

    for i in 1..n {
        if i < period {
            sm_tr += tr[i];
            sm_plus += plus_dm[i];
            sm_minus += minus_dm[i];
            continue;
        }
        if i == period {
            sm_tr = (sm_tr + tr[i]) / period as f64;
            sm_plus = (sm_plus + plus_dm[i]) / period as f64;
            sm_minus = (sm_minus + minus_dm[i]) / period as f64;
        } else {
            sm_tr = (sm_tr * (period - 1) as f64 + tr[i]) / period as f64;
            sm_plus = (sm_plus * (period - 1) as f64 + plus_dm[i]) / period as f64;
            sm_minus = (sm_minus * (period - 1) as f64 + minus_dm[i]) / period as f64;
        }

        if sm_tr > 0.0 {
            let p = 100.0 * sm_plus / sm_tr;
            let m = 100.0 * sm_minus / sm_tr;
            di_plus[i] = finite(p);
            di_minus[i] = finite(m);
            if p + m > 0.0 {
                dx[i] = finite(100.0 * (p - m).abs() / (p + m));
            }
        }
    }

    let adx = wilder_over(&dx, period);

    DirectionalColumns {
        di_plus,
        di_minus,
        adx,
    }
}

/// Awesome Oscillator: SMA(5) − SMA(34) of the bar midpoint.
pub fn awesome(bars: &[PriceBar]) -> Column {
    let mid: Vec<f64> = bars.iter().map(|b| b.median_price()).collect();
    let fast = sma(&mid, 5);
    let slow = sma(&mid, 34);
    fast.into_iter()
        .zip(slow)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => finite(f - s),
            _ => None,
        })
        .collect()
}

/// Momentum as a delta: close − close `period` bars ago.
pub fn momentum(closes: &[f64], period: usize) -> Column {
    let mut out = vec![None; closes.len()];
    if period == 0 {
        return out;
    }
    for i in period..closes.len() {
        out[i] = finite(closes[i] - closes[i - period]);
    }
    out
}

/// MACD line and its signal line. The line is EMA(fast) − EMA(slow); the
/// signal is an EMA of the line seeded once the line's warmup has passed.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal: usize) -> (Column, Column) {
    let ema_fast = ema(closes, fast);
    let ema_slow = ema(closes, slow);

    let line: Column = ema_fast
        .into_iter()
        .zip(ema_slow)
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => finite(f - s),
            _ => None,
        })
        .collect();

    let signal_line = ema_over(&line, signal);
    (line, signal_line)
}

/// Stochastic RSI %K/%D on a 0..100 scale: the stochastic of the RSI
/// column over `stoch_period`, SMA-smoothed twice.
pub fn stoch_rsi(
    closes: &[f64],
    rsi_period: usize,
    stoch_period: usize,
    smooth: usize,
) -> (Column, Column) {
    let rsi_col = rsi(closes, rsi_period);
    let hh = max_over(&rsi_col, stoch_period);
    let ll = min_over(&rsi_col, stoch_period);

    let raw: Column = rsi_col
        .iter()
        .enumerate()
        .map(|(i, r)| match (r, hh[i], ll[i]) {
            (Some(r), Some(h), Some(l)) if h > l => finite(100.0 * (r - l) / (h - l)),
            _ => None,
        })
        .collect();

    let k = sma_over(&raw, smooth);
    let d = sma_over(&k, smooth);
    (k, d)
}

/// Williams %R: −100*(HH − close)/(HH − LL), in [−100, 0].
pub fn williams_r(bars: &[PriceBar], period: usize) -> Column {
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let hh = rolling_max(&highs, period);
    let ll = rolling_min(&lows, period);

    bars.iter()
        .enumerate()
        .map(|(i, b)| match (hh[i], ll[i]) {
            (Some(h), Some(l)) if h > l => finite(-100.0 * (h - b.close) / (h - l)),
            _ => None,
        })
        .collect()
}

/// Ultimate Oscillator (7/14/28): buying-pressure/true-range sums
/// weighted 4:2:1, scaled to 0..100.
pub fn ultimate(bars: &[PriceBar], short: usize, mid: usize, long: usize) -> Column {
    let n = bars.len();
    let mut out = vec![None; n];
    if n < long + 1 || short == 0 {
        return out;
    }

    // bp/tr are defined from the second bar on.
    let mut bp = vec![0.0; n];
    let mut tr = vec![0.0; n];
    for i in 1..n {
        let prev_close = bars[i - 1].close;
        let true_low = bars[i].low.min(prev_close);
        let true_high = bars[i].high.max(prev_close);
        bp[i] = bars[i].close - true_low;
        tr[i] = true_high - true_low;
    }

    let window_avg = |i: usize, p: usize| -> Option<f64> {
        let bp_sum: f64 = bp[i + 1 - p..=i].iter().sum();
        let tr_sum: f64 = tr[i + 1 - p..=i].iter().sum();
        (tr_sum > 0.0).then(|| bp_sum / tr_sum)
    };

    for i in long..n {
        let (Some(a), Some(b), Some(c)) =
            (window_avg(i, short), window_avg(i, mid), window_avg(i, long))
        else {
            continue;
        };
        out[i] = finite(100.0 * (4.0 * a + 2.0 * b + c) / 7.0);
    }
    out
}
