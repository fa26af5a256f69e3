use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Event window error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Classifier configuration error: {0}")]
    Strategy(#[from] strategies::StrategyError),
}
