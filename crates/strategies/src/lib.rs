//! # Aftershock Strategy Rules
//!
//! Maps a computed `MetricSet` to investor-style `StrategyLabel`s through fixed,
//! inspectable threshold rules.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It depends only on
//!   `core-types` and `configuration`.
//! - **Independent Rules:** Every label is decided by its own `Rule`. Rules never
//!   see each other's outcome; a metric set may satisfy several of them.
//! - **Total Classification:** `StrategyClassifier::classify` always returns at
//!   least one label. `Neutral` is reported only when no other rule fires.
//!
//! ## Public API
//!
//! - `Rule`: The trait every labelling rule implements.
//! - `create_rules`: Builds the standard rule set from configuration.
//! - `StrategyClassifier`: Evaluates the rules against a metric set.

pub mod classifier;
pub mod defensive;
pub mod error;
pub mod factory;
pub mod fast_recovery;
pub mod growth;

pub use classifier::{Classification, StrategyClassifier};
pub use defensive::DefensiveRule;
pub use error::StrategyError;
pub use factory::create_rules;
pub use fast_recovery::FastRecoveryRule;
pub use growth::GrowthRule;

use core_types::{MetricSet, StrategyLabel};

/// A single threshold rule that awards one label.
///
/// A rule that depends on a metric the engine could not compute (an empty
/// `Option` field) must report `false` rather than fail.
/// The `Send + Sync` bounds allow a classifier to be shared by the parallel
/// batch analyser.
pub trait Rule: Send + Sync {
    /// The label this rule awards.
    fn label(&self) -> StrategyLabel;

    /// Whether the metric set qualifies for the label.
    fn fires(&self, metrics: &MetricSet) -> bool;
}

#[cfg(test)]
pub(crate) mod test_support {
    use core_types::MetricSet;

    /// A neutral-looking metric set that individual tests adjust.
    pub fn metrics() -> MetricSet {
        MetricSet {
            event_id: "event".to_string(),
            sector_id: "XLE".to_string(),
            pre_return: 0.0,
            post_return: 0.0,
            beta: Some(1.0),
            volatility: Some(0.5),
            max_drawdown: 0.5,
            recovery_periods: None,
            conditions: vec![],
        }
    }
}
