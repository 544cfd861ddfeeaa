//! Strategy configuration types

use serde::{Deserialize, Serialize};

/// Strategy variants selectable by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Minimal price-change threshold crossing
    Threshold,
    /// Regime-adaptive indicator scoring
    Adaptive,
    /// Adaptive scoring gated by commission economics
    #[default]
    CostAware,
}

impl StrategyKind {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "threshold" | "simple" | "simple_fast" => Some(Self::Threshold),
            "adaptive" | "smart_adaptive" => Some(Self::Adaptive),
            "cost_aware" | "cost-aware" | "advanced" => Some(Self::CostAware),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Threshold => "Simple Fast Strategy",
            Self::Adaptive => "Smart Adaptive Strategy",
            Self::CostAware => "Cost Aware Smart Strategy",
        }
    }
}

/// Commission economics for the cost-aware filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostConfig {
    /// Proportional broker commission, charged on entry and on exit
    pub commission: f64,

    /// Minimum net profit fraction required to exit
    pub required_profit_margin: f64,

    /// Net loss fraction (negative) at or below which the position is abandoned
    pub stop_loss_pct: f64,

    /// Upper band must exceed the break-even sell price times this factor to enter
    pub buy_headroom: f64,
}

impl Default for CostConfig {
    fn default() -> Self {
        Self {
            commission: 0.0005,
            required_profit_margin: 0.001,
            stop_loss_pct: -0.015,
            buy_headroom: 1.005,
        }
    }
}

/// Configuration for building a strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub kind: StrategyKind,

    pub cost: CostConfig,

    /// Relative price change that triggers the threshold strategy
    pub price_change_threshold: f64,

    /// Price buffer capacity for the adaptive strategies
    pub adaptive_capacity: usize,

    /// Price buffer capacity for the threshold strategy
    pub threshold_capacity: usize,
}

impl StrategyConfig {
    pub fn threshold() -> Self {
        Self {
            kind: StrategyKind::Threshold,
            ..Self::default()
        }
    }

    pub fn adaptive() -> Self {
        Self {
            kind: StrategyKind::Adaptive,
            ..Self::default()
        }
    }

    pub fn cost_aware(cost: CostConfig) -> Self {
        Self {
            kind: StrategyKind::CostAware,
            cost,
            ..Self::default()
        }
    }
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            kind: StrategyKind::default(),
            cost: CostConfig::default(),
            price_change_threshold: 0.001,
            adaptive_capacity: 1000,
            threshold_capacity: 3000,
        }
    }
}
