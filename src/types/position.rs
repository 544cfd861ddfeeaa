use serde::{Deserialize, Serialize};

/// Side of the tracked position. Only long positions are opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PositionSide {
    #[default]
    #[serde(rename = "NONE")]
    Flat,
    Long,
}

/// Position lifecycle tracked by the cost-aware filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PositionState {
    pub side: PositionSide,
    pub entry_price: f64,
    pub trade_count: u32,
    /// Accrues on every accepted entry and exit; never decreases.
    pub total_commission: f64,
}

impl PositionState {
    pub fn is_long(&self) -> bool {
        self.side == PositionSide::Long
    }

    pub fn is_flat(&self) -> bool {
        self.side == PositionSide::Flat
    }
}
