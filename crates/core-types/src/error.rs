use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Invalid price series '{symbol}': {reason}")]
    InvalidSeries { symbol: String, reason: String },
}
