use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete trading signal surfaced by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
}

impl Signal {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "BUY" => Some(Signal::Buy),
            "SELL" => Some(Signal::Sell),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Buy => "BUY",
            Signal::Sell => "SELL",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical market state derived from trend slope and strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MarketRegime {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl MarketRegime {
    pub fn label(&self) -> &'static str {
        match self {
            MarketRegime::Bullish => "BULLISH",
            MarketRegime::Bearish => "BEARISH",
            MarketRegime::Neutral => "NEUTRAL",
        }
    }

    /// Bullish and bearish regimes both count as trending.
    pub fn is_trending(&self) -> bool {
        !matches!(self, MarketRegime::Neutral)
    }
}

impl fmt::Display for MarketRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of the regime classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RegimeState {
    pub regime: MarketRegime,
    /// |R| of the price-vs-index regression, in [0, 1].
    pub trend_strength: f64,
    /// Std-dev of recent simple returns, as a percentage.
    pub volatility: f64,
}

/// Indicator window lengths, adapted to the current regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptiveParams {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub ema_trend: usize,
    pub rsi_period: usize,
    pub bb_period: usize,
    pub momentum_period: usize,
}

impl Default for AdaptiveParams {
    fn default() -> Self {
        Self {
            ema_fast: 6,
            ema_slow: 14,
            ema_trend: 30,
            rsi_period: 12,
            bb_period: 16,
            momentum_period: 8,
        }
    }
}

/// Latest indicator values for one analysis step. Never cached across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub price: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub ema_trend: f64,
    pub rsi: f64,
    pub bb_upper: f64,
    pub bb_middle: f64,
    pub bb_lower: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_hist: f64,
    pub stoch_k: f64,
    pub stoch_d: f64,
    pub momentum: f64,
}

/// Read-only indicator projection for the presentation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_fast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_slow: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stoch_k: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regime: Option<MarketRegime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volatility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pnl_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trades: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commission: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl IndicatorSummary {
    /// True when nothing has been computed yet.
    pub fn is_empty(&self) -> bool {
        *self == IndicatorSummary::default()
    }
}

/// Round to `places` decimal places for display.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Emitted signal as delivered to the order/notification collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalEvent {
    pub signal: Signal,
    /// Raw exchange price that produced the signal.
    pub price: f64,
    /// Price after broker commission on this side.
    pub net_price: f64,
    pub commission_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instrument: Option<String>,
    /// Unix millis.
    pub timestamp: i64,
}

/// Per-session count of emitted signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SignalStats {
    pub buy: u32,
    pub sell: u32,
    pub total: u32,
}

impl SignalStats {
    pub fn record(&mut self, signal: Signal) {
        match signal {
            Signal::Buy => self.buy += 1,
            Signal::Sell => self.sell += 1,
        }
        self.total += 1;
    }
}
