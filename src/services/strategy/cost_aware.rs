//! Cost-aware position filter.
//!
//! Tracks a single long position and vetoes signals whose economics do not
//! survive the broker commission charged on both entry and exit.

use super::config::CostConfig;
use crate::types::{IndicatorSnapshot, PositionSide, PositionState, Signal};
use tracing::{debug, info};

/// Price after commission for the given side.
pub fn apply_broker_commission(price: f64, signal: Signal, commission: f64) -> f64 {
    match signal {
        Signal::Buy => price * (1.0 + commission),
        Signal::Sell => price * (1.0 - commission),
    }
}

/// Commission-aware veto and position lifecycle.
#[derive(Debug, Clone)]
pub struct CostFilter {
    config: CostConfig,
    position: PositionState,
}

impl CostFilter {
    pub fn new(config: CostConfig) -> Self {
        Self {
            config,
            position: PositionState::default(),
        }
    }

    pub fn config(&self) -> &CostConfig {
        &self.config
    }

    pub fn position(&self) -> PositionState {
        self.position
    }

    pub fn net_buy_price(&self, price: f64) -> f64 {
        apply_broker_commission(price, Signal::Buy, self.config.commission)
    }

    pub fn net_sell_price(&self, price: f64) -> f64 {
        apply_broker_commission(price, Signal::Sell, self.config.commission)
    }

    /// Exit price at which a long entered at `entry_price` nets zero after both commissions.
    pub fn break_even_sell_price(&self, entry_price: f64) -> f64 {
        self.net_buy_price(entry_price) / (1.0 - self.config.commission)
    }

    /// Net profit fraction of a round trip from `entry_price` to `exit_price`.
    pub fn profit_pct(&self, entry_price: f64, exit_price: f64) -> f64 {
        let net_buy = self.net_buy_price(entry_price);
        (self.net_sell_price(exit_price) - net_buy) / net_buy
    }

    /// Net unrealized PnL in percent while long.
    pub fn unrealized_pnl_pct(&self, price: f64) -> Option<f64> {
        if !self.position.is_long() {
            return None;
        }
        Some(self.profit_pct(self.position.entry_price, price) * 100.0)
    }

    /// Veto signals that do not clear the cost checks. Never mutates the position.
    pub fn filter(
        &self,
        signal: Option<Signal>,
        price: f64,
        snapshot: &IndicatorSnapshot,
    ) -> Option<Signal> {
        match signal? {
            Signal::Buy => {
                if self.position.is_long() {
                    return None;
                }
                let break_even = self.break_even_sell_price(price);
                if snapshot.bb_upper > break_even * self.config.buy_headroom {
                    Some(Signal::Buy)
                } else {
                    debug!(
                        "BUY vetoed: upper band {:.4} leaves no room above break-even {:.4}",
                        snapshot.bb_upper, break_even
                    );
                    None
                }
            }
            Signal::Sell => {
                if !self.position.is_long() {
                    return None;
                }
                let profit = self.profit_pct(self.position.entry_price, price);
                if profit > self.config.required_profit_margin
                    || profit < self.config.stop_loss_pct
                {
                    Some(Signal::Sell)
                } else {
                    debug!(
                        "SELL held: net profit {:.4}% inside [{:.2}%, {:.2}%]",
                        profit * 100.0,
                        self.config.stop_loss_pct * 100.0,
                        self.config.required_profit_margin * 100.0
                    );
                    None
                }
            }
        }
    }

    /// Apply an accepted, emitted signal to the position.
    pub fn record(&mut self, signal: Signal, price: f64) {
        match (signal, self.position.side) {
            (Signal::Buy, PositionSide::Flat) => {
                self.position.side = PositionSide::Long;
                self.position.entry_price = price;
                self.position.trade_count += 1;
                self.position.total_commission += price * self.config.commission;
                info!("Opened LONG at {:.4}", price);
            }
            (Signal::Sell, PositionSide::Long) => {
                let profit = self.profit_pct(self.position.entry_price, price);
                self.position.side = PositionSide::Flat;
                self.position.total_commission += price * self.config.commission;
                info!(
                    "Closed LONG from {:.4} at {:.4} (net {:.3}%)",
                    self.position.entry_price,
                    price,
                    profit * 100.0
                );
            }
            _ => {}
        }
    }

    pub fn reset(&mut self) {
        self.position = PositionState::default();
    }
}
