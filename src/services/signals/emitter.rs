//! Edge-triggered signal emission.

use crate::types::Signal;
use std::collections::VecDeque;

/// Retained emitted signals.
pub const SIGNAL_HISTORY_CAPACITY: usize = 8;

/// Surfaces a signal only when it differs from the last surfaced one.
#[derive(Debug, Clone, Default)]
pub struct EdgeTrigger {
    history: VecDeque<Signal>,
}

impl EdgeTrigger {
    pub fn new() -> Self {
        Self {
            history: VecDeque::with_capacity(SIGNAL_HISTORY_CAPACITY),
        }
    }

    /// Pass `candidate` through if it is a change; repeats are swallowed.
    pub fn surface(&mut self, candidate: Option<Signal>) -> Option<Signal> {
        let signal = candidate?;
        if self.last() == Some(signal) {
            return None;
        }

        if self.history.len() >= SIGNAL_HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(signal);
        Some(signal)
    }

    /// Last surfaced signal.
    pub fn last(&self) -> Option<Signal> {
        self.history.back().copied()
    }

    /// Surfaced signals, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Signal> {
        self.history.iter()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}
