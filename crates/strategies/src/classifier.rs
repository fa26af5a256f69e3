use crate::error::StrategyError;
use crate::factory::create_rules;
use crate::Rule;
use configuration::ClassifierParams;
use core_types::{MetricSet, StrategyLabel};
use serde::Serialize;
use std::fmt;

/// The labels awarded to one metric set. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    labels: Vec<StrategyLabel>,
}

impl Classification {
    pub fn labels(&self) -> &[StrategyLabel] {
        &self.labels
    }

    pub fn contains(&self, label: StrategyLabel) -> bool {
        self.labels.contains(&label)
    }

    pub fn is_neutral(&self) -> bool {
        self.labels == [StrategyLabel::Neutral]
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.labels.iter().map(|l| l.to_string()).collect();
        f.write_str(&names.join(", "))
    }
}

/// Evaluates every rule independently against a metric set.
pub struct StrategyClassifier {
    rules: Vec<Box<dyn Rule>>,
}

impl StrategyClassifier {
    /// Creates a classifier with the standard rules and the given thresholds.
    pub fn new(params: &ClassifierParams) -> Result<Self, StrategyError> {
        Ok(Self::with_rules(create_rules(params)?))
    }

    /// Creates a classifier from an arbitrary rule set.
    pub fn with_rules(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, metrics: &MetricSet) -> Classification {
        let mut labels: Vec<StrategyLabel> = self
            .rules
            .iter()
            .filter(|rule| rule.fires(metrics))
            .map(|rule| rule.label())
            .collect();
        labels.sort();
        labels.dedup();

        if labels.is_empty() {
            labels.push(StrategyLabel::Neutral);
        }

        tracing::debug!(
            event = %metrics.event_id,
            sector = %metrics.sector_id,
            ?labels,
            "Classified metric set."
        );

        Classification { labels }
    }
}

impl fmt::Debug for StrategyClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<StrategyLabel> = self.rules.iter().map(|r| r.label()).collect();
        f.debug_struct("StrategyClassifier").field("rules", &labels).finish()
    }
}
