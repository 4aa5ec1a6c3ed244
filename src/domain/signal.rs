//! Signal names, verdicts, and the fixed rule table.
//!
//! The rule set is data, not control flow: [`rule_table`] maps every
//! [`SignalName`] to its family and one [`SignalRule`] archetype with its
//! thresholds. The evaluator in [`crate::domain::signal_eval`] interprets the
//! table; changing a threshold never touches evaluator code. The table is
//! append-only versioned — the aggregator's counts are meaningful only while
//! every name belongs to exactly one family.

use crate::domain::indicator::Field;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Buy,
    Sell,
    Neutral,
    /// An input the rule needs is missing (warmup, no previous bar,
    /// degenerate window). Never folded into Neutral.
    Unavailable,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Verdict::Buy => "Buy",
            Verdict::Sell => "Sell",
            Verdict::Neutral => "Neutral",
            Verdict::Unavailable => "N/A",
        };
        f.write_str(s)
    }
}

/// The two disjoint signal families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Oscillator,
    MovingAverage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignalName {
    // Oscillator family
    Rsi,
    Stochastic,
    Cci,
    Adx,
    AwesomeOsc,
    Momentum,
    Macd,
    StochRsi,
    WilliamsR,
    BullBear,
    UltimateOsc,
    // Moving-average family
    Sma10,
    Sma20,
    Sma30,
    Sma50,
    Sma100,
    Sma200,
    Ema10,
    Ema20,
    Ema30,
    Ema50,
    Ema100,
    Ema200,
    Vwma,
    HullMa,
    Ichimoku,
}

impl fmt::Display for SignalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SignalName::Rsi => "RSI",
            SignalName::Stochastic => "Stochastic",
            SignalName::Cci => "CCI",
            SignalName::Adx => "ADX",
            SignalName::AwesomeOsc => "AO",
            SignalName::Momentum => "Momentum",
            SignalName::Macd => "MACD",
            SignalName::StochRsi => "StochRSI",
            SignalName::WilliamsR => "Williams%R",
            SignalName::BullBear => "BullBearPower",
            SignalName::UltimateOsc => "UO",
            SignalName::Sma10 => "MA10",
            SignalName::Sma20 => "MA20",
            SignalName::Sma30 => "MA30",
            SignalName::Sma50 => "MA50",
            SignalName::Sma100 => "MA100",
            SignalName::Sma200 => "MA200",
            SignalName::Ema10 => "EMA10",
            SignalName::Ema20 => "EMA20",
            SignalName::Ema30 => "EMA30",
            SignalName::Ema50 => "EMA50",
            SignalName::Ema100 => "EMA100",
            SignalName::Ema200 => "EMA200",
            SignalName::Vwma => "VWMA",
            SignalName::HullMa => "HullMA",
            SignalName::Ichimoku => "Ichimoku",
        };
        f.write_str(s)
    }
}

/// Rule archetypes. `prev` inputs always come from the previous bar's
/// snapshot, never from lookback into a shared series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SignalRule {
    /// close above the line => Buy, below => Sell, equal => Neutral.
    PriceAboveLine { line: Field },
    /// Oversold and rising => Buy; overbought and falling => Sell.
    BandReversal {
        field: Field,
        oversold: f64,
        overbought: f64,
    },
    /// Both lines inside the band and fast crossing the slow:
    /// below `lower` with fast > slow => Buy; above `upper` with
    /// fast < slow => Sell.
    BandedCross {
        fast: Field,
        slow: Field,
        lower: f64,
        upper: f64,
    },
    /// line above its signal => Buy, below => Sell.
    LineCross { line: Field, signal: Field },
    /// Rising vs the previous bar => Buy, falling => Sell.
    RisingFalling { field: Field },
    /// Above zero and rising => Buy; below zero and falling => Sell.
    ZeroLineTrend { field: Field },
    /// Plain band: above `buy_above` => Buy, below `sell_below` => Sell.
    Band { field: Field, buy_above: f64, sell_below: f64 },
    /// +DI/−DI dominance while ADX is above `threshold` and strengthening.
    AdxTrend { threshold: f64 },
    /// Elder-ray: EMA13 trend direction gated by bull/bear power recovery.
    BullBearPower,
    /// Full cloud alignment: span A vs span B, base vs span A, conversion
    /// vs base, price vs conversion, all in the same direction.
    IchimokuCloud,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalSpec {
    pub name: SignalName,
    pub family: Family,
    pub rule: SignalRule,
}

/// The fixed signal rule table, in output order.
pub fn rule_table() -> &'static [SignalSpec] {
    use Family::{MovingAverage, Oscillator};
    use SignalName as N;
    use SignalRule as R;

    const TABLE: &[SignalSpec] = &[
        SignalSpec {
            name: N::Rsi,
            family: Oscillator,
            rule: R::BandReversal {
                field: Field::Rsi14,
                oversold: 30.0,
                overbought: 70.0,
            },
        },
        SignalSpec {
            name: N::Stochastic,
            family: Oscillator,
            rule: R::BandedCross {
                fast: Field::StochK,
                slow: Field::StochD,
                lower: 20.0,
                upper: 80.0,
            },
        },
        SignalSpec {
            name: N::Cci,
            family: Oscillator,
            rule: R::BandReversal {
                field: Field::Cci20,
                oversold: -100.0,
                overbought: 100.0,
            },
        },
        SignalSpec {
            name: N::Adx,
            family: Oscillator,
            rule: R::AdxTrend { threshold: 20.0 },
        },
        SignalSpec {
            name: N::AwesomeOsc,
            family: Oscillator,
            rule: R::ZeroLineTrend {
                field: Field::Awesome,
            },
        },
        SignalSpec {
            name: N::Momentum,
            family: Oscillator,
            rule: R::RisingFalling {
                field: Field::Momentum10,
            },
        },
        SignalSpec {
            name: N::Macd,
            family: Oscillator,
            rule: R::LineCross {
                line: Field::Macd,
                signal: Field::MacdSignal,
            },
        },
        SignalSpec {
            name: N::StochRsi,
            family: Oscillator,
            rule: R::BandedCross {
                fast: Field::StochRsiK,
                slow: Field::StochRsiD,
                lower: 20.0,
                upper: 80.0,
            },
        },
        SignalSpec {
            name: N::WilliamsR,
            family: Oscillator,
            rule: R::BandReversal {
                field: Field::WilliamsR,
                oversold: -80.0,
                overbought: -20.0,
            },
        },
        SignalSpec {
            name: N::BullBear,
            family: Oscillator,
            rule: R::BullBearPower,
        },
        SignalSpec {
            name: N::UltimateOsc,
            family: Oscillator,
            rule: R::Band {
                field: Field::Ultimate,
                buy_above: 70.0,
                sell_below: 30.0,
            },
        },
        SignalSpec {
            name: N::Sma10,
            family: MovingAverage,
            rule: R::PriceAboveLine { line: Field::Sma10 },
        },
        SignalSpec {
            name: N::Sma20,
            family: MovingAverage,
            rule: R::PriceAboveLine { line: Field::Sma20 },
        },
        SignalSpec {
            name: N::Sma30,
            family: MovingAverage,
            rule: R::PriceAboveLine { line: Field::Sma30 },
        },
        SignalSpec {
            name: N::Sma50,
            family: MovingAverage,
            rule: R::PriceAboveLine { line: Field::Sma50 },
        },
        SignalSpec {
            name: N::Sma100,
            family: MovingAverage,
            rule: R::PriceAboveLine {
                line: Field::Sma100,
            },
        },
        SignalSpec {
            name: N::Sma200,
            family: MovingAverage,
            rule: R::PriceAboveLine {
                line: Field::Sma200,
            },
        },
        SignalSpec {
            name: N::Ema10,
            family: MovingAverage,
            rule: R::PriceAboveLine { line: Field::Ema10 },
        },
        SignalSpec {
            name: N::Ema20,
            family: MovingAverage,
            rule: R::PriceAboveLine { line: Field::Ema20 },
        },
        SignalSpec {
            name: N::Ema30,
            family: MovingAverage,
            rule: R::PriceAboveLine { line: Field::Ema30 },
        },
        SignalSpec {
            name: N::Ema50,
            family: MovingAverage,
            rule: R::PriceAboveLine { line: Field::Ema50 },
        },
        SignalSpec {
            name: N::Ema100,
            family: MovingAverage,
            rule: R::PriceAboveLine {
                line: Field::Ema100,
            },
        },
        SignalSpec {
            name: N::Ema200,
            family: MovingAverage,
            rule: R::PriceAboveLine {
                line: Field::Ema200,
            },
        },
        SignalSpec {
            name: N::Vwma,
            family: MovingAverage,
            rule: R::PriceAboveLine {
                line: Field::Vwma20,
            },
        },
        SignalSpec {
            name: N::HullMa,
            family: MovingAverage,
            rule: R::PriceAboveLine { line: Field::Hull9 },
        },
        SignalSpec {
            name: N::Ichimoku,
            family: MovingAverage,
            rule: R::IchimokuCloud,
        },
    ];
    TABLE
}

/// One verdict per rule-table entry, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalSet {
    verdicts: Vec<(SignalName, Verdict)>,
}

impl SignalSet {
    pub(crate) fn from_verdicts(verdicts: Vec<(SignalName, Verdict)>) -> Self {
        debug_assert_eq!(verdicts.len(), rule_table().len());
        Self { verdicts }
    }

    /// Every signal Unavailable — the row shape for tickers with no data.
    pub fn all_unavailable() -> Self {
        Self {
            verdicts: rule_table()
                .iter()
                .map(|spec| (spec.name, Verdict::Unavailable))
                .collect(),
        }
    }

    pub fn get(&self, name: SignalName) -> Verdict {
        self.verdicts
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .unwrap_or(Verdict::Unavailable)
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignalName, Verdict)> + '_ {
        self.verdicts.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }
}
