//! Weighted BUY/SELL scoring over an indicator snapshot.

use crate::types::{IndicatorSnapshot, MarketRegime, Signal};

/// Minimum winning score for a decision.
pub const SCORE_THRESHOLD: u8 = 4;

const RSI_OVERSOLD: f64 = 38.0;
const RSI_OVERBOUGHT: f64 = 62.0;
const STOCH_OVERSOLD: f64 = 25.0;
const STOCH_OVERBOUGHT: f64 = 75.0;
const LOWER_BAND_PROXIMITY: f64 = 1.01;
const UPPER_BAND_PROXIMITY: f64 = 0.99;

/// Buy and sell tallies for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreCard {
    pub buy: u8,
    pub sell: u8,
}

impl ScoreCard {
    /// BUY or SELL when one side reaches the threshold and strictly leads.
    pub fn decision(&self) -> Option<Signal> {
        if self.buy >= SCORE_THRESHOLD && self.buy > self.sell {
            Some(Signal::Buy)
        } else if self.sell >= SCORE_THRESHOLD && self.sell > self.buy {
            Some(Signal::Sell)
        } else {
            None
        }
    }
}

/// Tally the six weighted conditions.
pub fn score(snapshot: &IndicatorSnapshot, regime: MarketRegime) -> ScoreCard {
    let mut card = ScoreCard::default();

    // EMA ordering
    if snapshot.ema_fast > snapshot.ema_slow && snapshot.ema_slow > snapshot.ema_trend {
        card.buy += 2;
    } else if snapshot.ema_fast < snapshot.ema_slow && snapshot.ema_slow < snapshot.ema_trend {
        card.sell += 2;
    }

    if snapshot.macd > snapshot.macd_signal {
        card.buy += 1;
    } else if snapshot.macd < snapshot.macd_signal {
        card.sell += 1;
    }

    // Oversold / overbought
    if snapshot.rsi < RSI_OVERSOLD && snapshot.stoch_k < STOCH_OVERSOLD {
        card.buy += 1;
    } else if snapshot.rsi > RSI_OVERBOUGHT && snapshot.stoch_k > STOCH_OVERBOUGHT {
        card.sell += 1;
    }

    // Zero momentum counts against.
    if snapshot.momentum > 0.0 {
        card.buy += 1;
    } else {
        card.sell += 1;
    }

    if snapshot.price <= snapshot.bb_lower * LOWER_BAND_PROXIMITY {
        card.buy += 1;
    } else if snapshot.price >= snapshot.bb_upper * UPPER_BAND_PROXIMITY {
        card.sell += 1;
    }

    match regime {
        MarketRegime::Bullish => card.buy += 1,
        MarketRegime::Bearish => card.sell += 1,
        MarketRegime::Neutral => {}
    }

    card
}

/// Score a snapshot and decide. `None` snapshot means no signal.
pub fn decide(snapshot: Option<&IndicatorSnapshot>, regime: MarketRegime) -> Option<Signal> {
    snapshot.and_then(|s| score(s, regime).decision())
}
