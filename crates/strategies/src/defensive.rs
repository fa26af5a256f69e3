use crate::error::{check_threshold, StrategyError};
use crate::Rule;
use configuration::ClassifierParams;
use core_types::{MetricSet, StrategyLabel};

/// Low volatility combined with a shallow post-event drawdown.
#[derive(Debug, Clone)]
pub struct DefensiveRule {
    volatility_threshold: f64,
    max_drawdown_cap: f64,
}

impl DefensiveRule {
    pub fn new(params: &ClassifierParams) -> Result<Self, StrategyError> {
        check_threshold("volatility_threshold", params.volatility_threshold)?;
        check_threshold("max_drawdown_cap", params.max_drawdown_cap)?;
        Ok(Self {
            volatility_threshold: params.volatility_threshold,
            max_drawdown_cap: params.max_drawdown_cap,
        })
    }
}

impl Rule for DefensiveRule {
    fn label(&self) -> StrategyLabel {
        StrategyLabel::Defensive
    }

    fn fires(&self, metrics: &MetricSet) -> bool {
        let Some(volatility) = metrics.volatility else {
            return false;
        };
        volatility <= self.volatility_threshold && metrics.max_drawdown < self.max_drawdown_cap
    }
}
