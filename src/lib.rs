//! Adaptive signals - regime-adaptive, cost-aware trading signal engine

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use error::{EngineError, Result};
pub use services::{build_strategy, ChartStore, LiveFeed, Strategy, StrategyConfig};
pub use types::*;
