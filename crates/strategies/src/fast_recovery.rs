use crate::error::StrategyError;
use crate::Rule;
use configuration::ClassifierParams;
use core_types::{MetricSet, StrategyLabel};

/// Back at the event-date level within a bounded number of periods.
#[derive(Debug, Clone)]
pub struct FastRecoveryRule {
    recovery_threshold: usize,
}

impl FastRecoveryRule {
    pub fn new(params: &ClassifierParams) -> Result<Self, StrategyError> {
        Ok(Self {
            recovery_threshold: params.recovery_threshold,
        })
    }
}

impl Rule for FastRecoveryRule {
    fn label(&self) -> StrategyLabel {
        StrategyLabel::FastRecovery
    }

    fn fires(&self, metrics: &MetricSet) -> bool {
        matches!(metrics.recovery_periods, Some(periods) if periods <= self.recovery_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::metrics;

    #[test]
    fn fires_only_for_recovered_sets_within_threshold() {
        let rule = FastRecoveryRule::new(&ClassifierParams {
            recovery_threshold: 10,
            ..Default::default()
        })
        .unwrap();

        let mut m = metrics();
        m.recovery_periods = Some(10);
        assert!(rule.fires(&m));
        m.recovery_periods = Some(0);
        assert!(rule.fires(&m));
        m.recovery_periods = Some(11);
        assert!(!rule.fires(&m));
        m.recovery_periods = None;
        assert!(!rule.fires(&m));
    }
}
