use thiserror::Error;

/// Engine error types.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Insufficient data: need {required} prices, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Degenerate series: {0}")]
    DegenerateSeries(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl EngineError {
    /// Whether the error only postpones computation until more ticks arrive.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            EngineError::InsufficientData { .. }
                | EngineError::DegenerateSeries(_)
                | EngineError::InvalidInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
