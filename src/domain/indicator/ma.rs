//! Moving averages: SMA, EMA, WMA, volume-weighted MA, Hull MA.

use crate::domain::indicator::{finite, wma_over, Column};

/// Simple moving average with an O(n) running-sum window.
/// Warmup: first (n-1) bars are unavailable.
pub fn sma(values: &[f64], period: usize) -> Column {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        sum += v;
        if i >= period {
            sum -= values[i - period];
        }
        if i + 1 >= period {
            out[i] = finite(sum / period as f64);
        }
    }
    out
}

/// Exponential moving average, k = 2/(n+1), seeded with SMA(n).
/// EMA[i] = V[i]*k + EMA[i-1]*(1-k); warmup (n-1) bars.
pub fn ema(values: &[f64], period: usize) -> Column {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    let k = 2.0 / (period as f64 + 1.0);
    let mut acc = 0.0;
    let mut sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        if i < period - 1 {
            sum += v;
        } else if i == period - 1 {
            sum += v;
            acc = sum / period as f64;
            out[i] = finite(acc);
        } else {
            acc = v * k + acc * (1.0 - k);
            out[i] = finite(acc);
        }
    }
    out
}

/// Linearly weighted moving average, O(n) sliding window.
/// WMA(n) = (1*V[i-n+1] + ... + n*V[i]) / (n*(n+1)/2)
pub fn wma(values: &[f64], period: usize) -> Column {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    let divisor = (period * (period + 1)) as f64 / 2.0;
    let mut weighted_sum = 0.0;
    let mut window_sum = 0.0;
    for (i, &v) in values.iter().enumerate() {
        if i < period {
            weighted_sum += (i + 1) as f64 * v;
            window_sum += v;
        } else {
            weighted_sum += period as f64 * v - window_sum;
            window_sum += v - values[i - period];
        }
        if i + 1 >= period {
            out[i] = finite(weighted_sum / divisor);
        }
    }
    out
}

/// Volume-weighted moving average: sum(close*vol, n) / sum(vol, n).
/// Unavailable when the window's volume sums to zero.
pub fn vwma(closes: &[f64], volumes: &[f64], period: usize) -> Column {
    debug_assert_eq!(closes.len(), volumes.len());
    let mut out = vec![None; closes.len()];
    if period == 0 {
        return out;
    }
    let mut pv_sum = 0.0;
    let mut v_sum = 0.0;
    for i in 0..closes.len() {
        pv_sum += closes[i] * volumes[i];
        v_sum += volumes[i];
        if i >= period {
            pv_sum -= closes[i - period] * volumes[i - period];
            v_sum -= volumes[i - period];
        }
        if i + 1 >= period && v_sum > 0.0 {
            out[i] = finite(pv_sum / v_sum);
        }
    }
    out
}

/// Hull moving average: WMA(2*WMA(n/2) - WMA(n), sqrt(n)).
/// Integer divisions mirror the canonical definition (n=9 → 4 and 3).
pub fn hull(values: &[f64], period: usize) -> Column {
    let half = period / 2;
    let sqrt_p = (period as f64).sqrt().floor() as usize;
    if half == 0 || sqrt_p == 0 {
        return vec![None; values.len()];
    }

    let wma_half = wma(values, half);
    let wma_full = wma(values, period);
    let diff: Column = wma_half
        .iter()
        .zip(&wma_full)
        .map(|(h, f)| match (h, f) {
            (Some(h), Some(f)) => finite(2.0 * h - f),
            _ => None,
        })
        .collect();

    wma_over(&diff, sqrt_p)
}
