use crate::error::StrategyError;
use crate::Rule;
use configuration::ClassifierParams;
use core_types::{MetricSet, StrategyLabel};

/// A strong return from the event date to the end of the window.
#[derive(Debug, Clone)]
pub struct GrowthRule {
    return_threshold: f64,
}

impl GrowthRule {
    /// The return threshold may be negative ("lost less than 5%"), but must be finite.
    pub fn new(params: &ClassifierParams) -> Result<Self, StrategyError> {
        if !params.return_threshold.is_finite() {
            return Err(StrategyError::InvalidParameters(
                "return_threshold must be finite".to_string(),
            ));
        }
        Ok(Self {
            return_threshold: params.return_threshold,
        })
    }
}

impl Rule for GrowthRule {
    fn label(&self) -> StrategyLabel {
        StrategyLabel::Growth
    }

    fn fires(&self, metrics: &MetricSet) -> bool {
        metrics.post_return >= self.return_threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::metrics;

    #[test]
    fn fires_at_or_above_threshold() {
        let rule = GrowthRule::new(&ClassifierParams {
            return_threshold: 0.05,
            ..Default::default()
        })
        .unwrap();

        let mut m = metrics();
        m.post_return = 0.08;
        assert!(rule.fires(&m));
        m.post_return = 0.05;
        assert!(rule.fires(&m));
        m.post_return = 0.049;
        assert!(!rule.fires(&m));
    }

    #[test]
    fn rejects_nan_threshold() {
        let params = ClassifierParams {
            return_threshold: f64::NAN,
            ..Default::default()
        };
        assert!(GrowthRule::new(&params).is_err());
    }
}
