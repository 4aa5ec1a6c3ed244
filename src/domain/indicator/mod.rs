//! Indicator computation engine.
//!
//! Indicators are computed as whole columns over a price series and then
//! assembled into per-bar [`snapshot::IndicatorSnapshot`] rows. A column is a
//! `Vec<Option<f64>>` aligned with the bars; `None` marks a bar whose trailing
//! window is not fully available (warmup) or whose computation was not
//! finite. Nothing in here panics on short input.

pub mod ichimoku;
pub mod ma;
pub mod oscillator;
pub mod snapshot;

pub use snapshot::{compute_snapshots, Field, IndicatorSnapshot};

/// One indicator value per bar, `None` where unavailable.
pub type Column = Vec<Option<f64>>;

/// NaN/inf guard applied at every column boundary.
pub(crate) fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// SMA over an already-gappy column: `None` unless the whole window is
/// present. Used for smoothing passes (%K/%D and friends) whose input
/// starts with a warmup prefix.
pub(crate) fn sma_over(col: &Column, period: usize) -> Column {
    rolling_over(col, period, |window| {
        window.iter().sum::<f64>() / period as f64
    })
}

/// Linear-weight WMA over a gappy column (weights 1..=period).
pub(crate) fn wma_over(col: &Column, period: usize) -> Column {
    let divisor = (period * (period + 1)) as f64 / 2.0;
    rolling_over(col, period, |window| {
        window
            .iter()
            .enumerate()
            .map(|(j, v)| (j + 1) as f64 * v)
            .sum::<f64>()
            / divisor
    })
}

/// Rolling max over a gappy column (full window required).
pub(crate) fn max_over(col: &Column, period: usize) -> Column {
    rolling_over(col, period, |w| w.iter().cloned().fold(f64::MIN, f64::max))
}

/// Rolling min over a gappy column (full window required).
pub(crate) fn min_over(col: &Column, period: usize) -> Column {
    rolling_over(col, period, |w| w.iter().cloned().fold(f64::MAX, f64::min))
}

/// EMA over a gappy column: seeds with the mean of the first `period`
/// consecutive present values, then applies the k = 2/(n+1) recurrence.
/// A gap resets the seed. This is how the MACD signal line is formed on
/// top of the warmup-prefixed MACD column.
pub(crate) fn ema_over(col: &Column, period: usize) -> Column {
    seeded_over(col, period, |prev, v, p| {
        let k = 2.0 / (p as f64 + 1.0);
        v * k + prev * (1.0 - k)
    })
}

/// Wilder smoothing over a gappy column: same seeding, recurrence
/// (prev*(n-1) + v) / n. Used for the ADX average of DX values.
pub(crate) fn wilder_over(col: &Column, period: usize) -> Column {
    seeded_over(col, period, |prev, v, p| {
        (prev * (p as f64 - 1.0) + v) / p as f64
    })
}

fn seeded_over(col: &Column, period: usize, step: impl Fn(f64, f64, usize) -> f64) -> Column {
    let mut out = vec![None; col.len()];
    if period == 0 {
        return out;
    }
    let mut acc: Option<f64> = None;
    let mut run: Vec<f64> = Vec::with_capacity(period);
    for (i, v) in col.iter().enumerate() {
        match v {
            None => {
                acc = None;
                run.clear();
            }
            Some(v) => match acc {
                Some(prev) => {
                    acc = finite(step(prev, *v, period));
                    out[i] = acc;
                }
                None => {
                    run.push(*v);
                    if run.len() == period {
                        acc = finite(run.iter().sum::<f64>() / period as f64);
                        out[i] = acc;
                        run.clear();
                    }
                }
            },
        }
    }
    out
}

fn rolling_over(col: &Column, period: usize, f: impl Fn(&[f64]) -> f64) -> Column {
    let mut out = vec![None; col.len()];
    if period == 0 {
        return out;
    }
    let mut window: Vec<f64> = Vec::with_capacity(period);
    for i in 0..col.len() {
        if i + 1 >= period {
            window.clear();
            for v in &col[i + 1 - period..=i] {
                match v {
                    Some(x) => window.push(*x),
                    None => break,
                }
            }
            if window.len() == period {
                out[i] = finite(f(&window));
            }
        }
    }
    out
}

/// Rolling max over a plain slice; `None` during warmup.
pub(crate) fn rolling_max(values: &[f64], period: usize) -> Column {
    rolling(values, period, |w| w.iter().cloned().fold(f64::MIN, f64::max))
}

/// Rolling min over a plain slice; `None` during warmup.
pub(crate) fn rolling_min(values: &[f64], period: usize) -> Column {
    rolling(values, period, |w| w.iter().cloned().fold(f64::MAX, f64::min))
}

fn rolling(values: &[f64], period: usize, f: impl Fn(&[f64]) -> f64) -> Column {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }
    for i in 0..values.len() {
        if i + 1 >= period {
            out[i] = finite(f(&values[i + 1 - period..=i]));
        }
    }
    out
}

/// Displace a column forward in time: `out[i] = col[i - by]`.
///
/// Used for the Ichimoku leading spans, which are projected 26 bars ahead of
/// the window they were computed from.
pub(crate) fn shift_forward(col: &Column, by: usize) -> Column {
    let mut out = vec![None; col.len()];
    for i in by..col.len() {
        out[i] = col[i - by];
    }
    out
}
