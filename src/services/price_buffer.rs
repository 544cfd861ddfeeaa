use crate::error::{EngineError, Result};
use std::collections::VecDeque;

/// Fixed-capacity rolling window of observed prices, oldest first.
#[derive(Debug, Clone)]
pub struct PriceBuffer {
    prices: VecDeque<f64>,
    capacity: usize,
}

impl PriceBuffer {
    /// Create an empty buffer. A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            prices: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append the newest price, evicting the oldest once over capacity.
    pub fn push(&mut self, price: f64) -> Option<f64> {
        let evicted = if self.prices.len() >= self.capacity {
            self.prices.pop_front()
        } else {
            None
        };
        self.prices.push_back(price);
        evicted
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent price.
    pub fn latest(&self) -> Option<f64> {
        self.prices.back().copied()
    }

    /// The most recent `n` prices in chronological order.
    pub fn window(&self, n: usize) -> Result<Vec<f64>> {
        if self.prices.len() < n {
            return Err(EngineError::InsufficientData {
                required: n,
                available: self.prices.len(),
            });
        }
        Ok(self.prices.iter().skip(self.prices.len() - n).copied().collect())
    }

    /// All retained prices as one contiguous chronological slice.
    pub fn as_slice(&mut self) -> &[f64] {
        self.prices.make_contiguous()
    }

    /// Owned copy of all retained prices, oldest first.
    pub fn to_vec(&self) -> Vec<f64> {
        self.prices.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.prices.clear();
    }
}
