use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Classifier received invalid parameters: {0}")]
    InvalidParameters(String),
}

/// Rejects thresholds that are negative or not finite.
pub(crate) fn check_threshold(name: &str, value: f64) -> Result<(), StrategyError> {
    if !value.is_finite() || value < 0.0 {
        return Err(StrategyError::InvalidParameters(format!(
            "{} must be a finite, non-negative number (got {})",
            name, value
        )));
    }
    Ok(())
}
