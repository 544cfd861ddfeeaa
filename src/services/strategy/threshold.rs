//! Minimal threshold-crossing strategy.

use super::{is_valid_price, Strategy};
use crate::services::price_buffer::PriceBuffer;
use crate::types::{round_to, IndicatorSnapshot, IndicatorSummary, Signal};
use tracing::{debug, info};

/// Signals whenever the relative change from the previous price crosses a threshold.
/// Not edge-triggered: consecutive jumps in the same direction each signal.
#[derive(Debug, Clone)]
pub struct ThresholdStrategy {
    buffer: PriceBuffer,
    last_price: Option<f64>,
    threshold: f64,
}

impl ThresholdStrategy {
    pub fn new(capacity: usize, threshold: f64) -> Self {
        Self {
            buffer: PriceBuffer::new(capacity),
            last_price: None,
            threshold: threshold.abs(),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn last_price(&self) -> Option<f64> {
        self.last_price
    }
}

impl Strategy for ThresholdStrategy {
    fn name(&self) -> &'static str {
        "Simple Fast Strategy"
    }

    fn add_price(&mut self, price: f64) {
        if !is_valid_price(price) {
            debug!("Dropping invalid price {}", price);
            return;
        }
        self.buffer.push(price);
        // Only seeds the reference; `analyze` is what moves it.
        self.last_price.get_or_insert(price);
    }

    fn analyze(&mut self, price: f64) -> Option<Signal> {
        if !is_valid_price(price) {
            debug!("Dropping invalid price {}", price);
            return None;
        }

        self.buffer.push(price);
        let last = self.last_price.replace(price)?;

        let change = (price - last) / last;
        let signal = if change > self.threshold {
            Signal::Buy
        } else if change < -self.threshold {
            Signal::Sell
        } else {
            return None;
        };

        info!("{} signal at {:.4} ({:+.3}%)", signal, price, change * 100.0);
        Some(signal)
    }

    fn indicator_snapshot(&self) -> Option<IndicatorSnapshot> {
        None
    }

    fn summary(&self) -> IndicatorSummary {
        if self.buffer.len() < self.min_prices() {
            return IndicatorSummary::default();
        }
        IndicatorSummary {
            last_price: self.last_price.map(|p| round_to(p, 2)),
            count: Some(self.buffer.len()),
            ..IndicatorSummary::default()
        }
    }

    fn price_count(&self) -> usize {
        self.buffer.len()
    }

    fn min_prices(&self) -> usize {
        2
    }

    fn reset(&mut self) {
        self.buffer.clear();
        self.last_price = None;
    }
}
