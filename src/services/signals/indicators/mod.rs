//! Technical indicator implementations.
//!
//! Every function takes a chronological price window (oldest first) and never
//! pads or guesses: a short window yields `None` (or the documented fallback).

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod momentum;
pub mod regression;
pub mod rsi;
pub mod stochastic;

pub use bollinger::{bollinger, std_dev, BollingerBands, DEFAULT_BAND_WIDTH};
pub use ema::ema;
pub use macd::{macd, MacdValue, MACD_FAST, MACD_SIGNAL, MACD_SLOW};
pub use momentum::momentum;
pub use regression::{linear_regression, LinearFit};
pub use rsi::rsi;
pub use stochastic::{stochastic, StochasticValue, STOCHASTIC_PERIOD};
