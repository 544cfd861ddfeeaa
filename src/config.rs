use crate::error::{EngineError, Result};
use crate::services::chart_store::DEFAULT_HISTORY_LIMIT;
use crate::services::strategy::{CostConfig, StrategyConfig, StrategyKind};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strategy selection and parameters.
    pub strategy: StrategyConfig,
    /// Sealed candles retained per chart resolution.
    pub candle_history_limit: usize,
    /// CSV backfill (2 or 5 columns), loaded before live ticks are folded.
    pub backfill_path: Option<PathBuf>,
    /// CSV live ticks; stdin when unset.
    pub ticks_path: Option<PathBuf>,
    /// Instrument UID or ticker used to label emitted signals.
    pub instrument: Option<String>,
    /// Display name registered for the instrument.
    pub instrument_name: Option<String>,
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// Unparseable numbers fall back to their defaults; an unknown strategy
    /// name is an error. The result is validated.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let kind = match lookup("STRATEGY") {
            Some(name) => StrategyKind::from_str(name.trim())
                .ok_or_else(|| EngineError::Config(format!("unknown STRATEGY '{}'", name)))?,
            None => StrategyKind::default(),
        };

        let cost_defaults = CostConfig::default();
        let cost = CostConfig {
            commission: parse_or(&lookup, "BROKER_COMMISSION", cost_defaults.commission),
            required_profit_margin: parse_or(
                &lookup,
                "REQUIRED_PROFIT_MARGIN",
                cost_defaults.required_profit_margin,
            ),
            stop_loss_pct: parse_or(&lookup, "STOP_LOSS_PCT", cost_defaults.stop_loss_pct),
            buy_headroom: parse_or(&lookup, "BUY_HEADROOM", cost_defaults.buy_headroom),
        };

        let defaults = StrategyConfig::default();
        let strategy = StrategyConfig {
            kind,
            cost,
            price_change_threshold: parse_or(
                &lookup,
                "PRICE_CHANGE_THRESHOLD",
                defaults.price_change_threshold,
            ),
            adaptive_capacity: parse_or(
                &lookup,
                "ADAPTIVE_BUFFER_CAPACITY",
                defaults.adaptive_capacity,
            ),
            threshold_capacity: parse_or(
                &lookup,
                "THRESHOLD_BUFFER_CAPACITY",
                defaults.threshold_capacity,
            ),
        };

        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            strategy,
            candle_history_limit: parse_or(&lookup, "CANDLE_HISTORY_LIMIT", DEFAULT_HISTORY_LIMIT),
            backfill_path: non_empty("BACKFILL_PATH").map(PathBuf::from),
            ticks_path: non_empty("TICKS_PATH").map(PathBuf::from),
            instrument: non_empty("INSTRUMENT"),
            instrument_name: non_empty("INSTRUMENT_NAME"),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let cost = &self.strategy.cost;
        if !(0.0..1.0).contains(&cost.commission) {
            return Err(EngineError::Config(format!(
                "BROKER_COMMISSION must be in [0, 1), got {}",
                cost.commission
            )));
        }
        if cost.stop_loss_pct > cost.required_profit_margin {
            return Err(EngineError::Config(format!(
                "STOP_LOSS_PCT ({}) must not exceed REQUIRED_PROFIT_MARGIN ({})",
                cost.stop_loss_pct, cost.required_profit_margin
            )));
        }
        if cost.buy_headroom <= 0.0 {
            return Err(EngineError::Config("BUY_HEADROOM must be positive".to_string()));
        }
        if self.strategy.price_change_threshold < 0.0 {
            return Err(EngineError::Config(
                "PRICE_CHANGE_THRESHOLD must not be negative".to_string(),
            ));
        }
        if self.strategy.adaptive_capacity == 0
            || self.strategy.threshold_capacity == 0
            || self.candle_history_limit == 0
        {
            return Err(EngineError::Config(
                "buffer capacities and CANDLE_HISTORY_LIMIT must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            strategy: StrategyConfig::default(),
            candle_history_limit: DEFAULT_HISTORY_LIMIT,
            backfill_path: None,
            ticks_path: None,
            instrument: None,
            instrument_name: None,
        }
    }
}
