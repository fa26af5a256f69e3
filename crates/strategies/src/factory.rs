use crate::defensive::DefensiveRule;
use crate::error::StrategyError;
use crate::fast_recovery::FastRecoveryRule;
use crate::growth::GrowthRule;
use crate::Rule;
use configuration::ClassifierParams;

/// Creates the standard rule set, one rule per non-neutral label.
pub fn create_rules(params: &ClassifierParams) -> Result<Vec<Box<dyn Rule>>, StrategyError> {
    Ok(vec![
        Box::new(DefensiveRule::new(params)?),
        Box::new(GrowthRule::new(params)?),
        Box::new(FastRecoveryRule::new(params)?),
    ])
}
