use serde::{Deserialize, Serialize};
use std::fmt;

/// Non-fatal circumstances recorded alongside a metric set so that consumers
/// know which figures to read with care.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetricCondition {
    /// The requested window ran past the available data on the flagged side(s).
    /// Drawdown and recovery may be understated when `post` is set.
    TruncatedWindow { pre: bool, post: bool },
    /// Too few observations to compute `metric`; the field is left empty.
    InsufficientData { metric: String, observations: usize },
    /// The benchmark did not move over the window, so beta is undefined.
    DegenerateBenchmark,
}

impl fmt::Display for MetricCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricCondition::TruncatedWindow { pre, post } => {
                let side = match (pre, post) {
                    (true, true) => "both ends",
                    (true, false) => "pre-event side",
                    _ => "post-event side",
                };
                write!(f, "window truncated on the {}", side)
            }
            MetricCondition::InsufficientData { metric, observations } => {
                write!(f, "insufficient data for {} ({} observations)", metric, observations)
            }
            MetricCondition::DegenerateBenchmark => f.write_str("benchmark flat over the window"),
        }
    }
}

/// The retrospective metrics for one (event, sector) pair.
///
/// Returns and drawdown are fractions (0.10 = 10%). Optional fields are `None`
/// when the window could not support the calculation; the reason is listed in
/// `conditions`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSet {
    pub event_id: String,
    pub sector_id: String,
    pub pre_return: f64,
    pub post_return: f64,
    pub beta: Option<f64>,
    /// Annualized standard deviation of period returns.
    pub volatility: Option<f64>,
    pub max_drawdown: f64,
    /// Post-event periods until the price first returns to the event-date level.
    pub recovery_periods: Option<usize>,
    pub conditions: Vec<MetricCondition>,
}

impl MetricSet {
    pub fn is_truncated(&self) -> bool {
        self.conditions
            .iter()
            .any(|c| matches!(c, MetricCondition::TruncatedWindow { .. }))
    }
}
