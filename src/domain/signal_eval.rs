//! Signal rule interpreter.
//!
//! `evaluate(current, previous)` is a pure function of the two snapshots: no
//! I/O, no hidden state. Replaying a historical bar through it produces the
//! identical verdict set, which is what lets prior-day ratings be recomputed
//! instead of cached.
//!
//! Missing-input policy: when any value a rule reads is unavailable —
//! including previous-bar values for direction rules, or the previous
//! snapshot itself on the first bar — the verdict is `Unavailable`, never a
//! guessed Neutral.

use crate::domain::indicator::{Field, IndicatorSnapshot};
use crate::domain::signal::{rule_table, SignalRule, SignalSet, Verdict};

/// Evaluate every rule in the table against one snapshot pair.
pub fn evaluate(
    current: &IndicatorSnapshot,
    previous: Option<&IndicatorSnapshot>,
) -> SignalSet {
    let verdicts = rule_table()
        .iter()
        .map(|spec| (spec.name, apply(&spec.rule, current, previous)))
        .collect();
    SignalSet::from_verdicts(verdicts)
}

fn apply(
    rule: &SignalRule,
    current: &IndicatorSnapshot,
    previous: Option<&IndicatorSnapshot>,
) -> Verdict {
    match *rule {
        SignalRule::PriceAboveLine { line } => {
            let Some(line) = current.value(line) else {
                return Verdict::Unavailable;
            };
            compare(current.close, line)
        }
        SignalRule::BandReversal {
            field,
            oversold,
            overbought,
        } => {
            let (Some(value), Some(prev)) = (current.value(field), prev_value(previous, field))
            else {
                return Verdict::Unavailable;
            };
            if value < oversold && value > prev {
                Verdict::Buy
            } else if value > overbought && value < prev {
                Verdict::Sell
            } else {
                Verdict::Neutral
            }
        }
        SignalRule::BandedCross {
            fast,
            slow,
            lower,
            upper,
        } => {
            let (Some(k), Some(d)) = (current.value(fast), current.value(slow)) else {
                return Verdict::Unavailable;
            };
            if k < lower && d < lower && k > d {
                Verdict::Buy
            } else if k > upper && d > upper && k < d {
                Verdict::Sell
            } else {
                Verdict::Neutral
            }
        }
        SignalRule::LineCross { line, signal } => {
            let (Some(line), Some(signal)) = (current.value(line), current.value(signal)) else {
                return Verdict::Unavailable;
            };
            compare(line, signal)
        }
        SignalRule::RisingFalling { field } => {
            let (Some(value), Some(prev)) = (current.value(field), prev_value(previous, field))
            else {
                return Verdict::Unavailable;
            };
            compare(value, prev)
        }
        SignalRule::ZeroLineTrend { field } => {
            let (Some(value), Some(prev)) = (current.value(field), prev_value(previous, field))
            else {
                return Verdict::Unavailable;
            };
            if value > 0.0 && value > prev {
                Verdict::Buy
            } else if value < 0.0 && value < prev {
                Verdict::Sell
            } else {
                Verdict::Neutral
            }
        }
        SignalRule::Band {
            field,
            buy_above,
            sell_below,
        } => {
            let Some(value) = current.value(field) else {
                return Verdict::Unavailable;
            };
            if value > buy_above {
                Verdict::Buy
            } else if value < sell_below {
                Verdict::Sell
            } else {
                Verdict::Neutral
            }
        }
        SignalRule::AdxTrend { threshold } => {
            let (Some(plus), Some(minus), Some(adx), Some(adx_prev)) = (
                current.value(Field::DiPlus),
                current.value(Field::DiMinus),
                current.value(Field::Adx14),
                prev_value(previous, Field::Adx14),
            ) else {
                return Verdict::Unavailable;
            };
            let strengthening = adx > threshold && adx > adx_prev;
            if strengthening && plus > minus {
                Verdict::Buy
            } else if strengthening && plus < minus {
                Verdict::Sell
            } else {
                Verdict::Neutral
            }
        }
        SignalRule::BullBearPower => {
            let (Some(ema), Some(ema_prev), Some(bull), Some(bear), Some(bull_prev), Some(bear_prev)) = (
                current.value(Field::Ema13),
                prev_value(previous, Field::Ema13),
                current.value(Field::BullPower),
                current.value(Field::BearPower),
                prev_value(previous, Field::BullPower),
                prev_value(previous, Field::BearPower),
            ) else {
                return Verdict::Unavailable;
            };
            if ema > ema_prev && bear < 0.0 && bear > bear_prev {
                Verdict::Buy
            } else if ema < ema_prev && bull > 0.0 && bull < bull_prev {
                Verdict::Sell
            } else {
                Verdict::Neutral
            }
        }
        SignalRule::IchimokuCloud => {
            let (Some(span_a), Some(span_b), Some(base), Some(conversion)) = (
                current.value(Field::IchimokuSpanA),
                current.value(Field::IchimokuSpanB),
                current.value(Field::IchimokuBase),
                current.value(Field::IchimokuConversion),
            ) else {
                return Verdict::Unavailable;
            };
            let price = current.close;
            let aligned_up = span_a > span_b
                && base > span_a
                && conversion > base
                && price > conversion;
            let aligned_down = span_a < span_b
                && base < span_a
                && conversion < base
                && price < conversion;
            if aligned_up {
                Verdict::Buy
            } else if aligned_down {
                Verdict::Sell
            } else {
                Verdict::Neutral
            }
        }
    }
}

fn prev_value(previous: Option<&IndicatorSnapshot>, field: Field) -> Option<f64> {
    previous.and_then(|snap| snap.value(field))
}

/// Above => Buy, below => Sell, exactly equal => Neutral.
fn compare(value: f64, reference: f64) -> Verdict {
    if value > reference {
        Verdict::Buy
    } else if value < reference {
        Verdict::Sell
    } else {
        Verdict::Neutral
    }
}
