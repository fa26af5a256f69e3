//! # Aftershock Core Types
//!
//! Layer 0 vocabulary shared by every crate in the workspace: price series as
//! delivered by the data collaborator, event specifications, normalized event
//! windows and the metric sets computed from them.
//!
//! Nothing in here performs I/O or computation beyond input validation and
//! simple accessors.

pub mod enums;
pub mod error;
pub mod metrics;
pub mod structs;
pub mod window;

// Re-export the core types to provide a clean public API.
pub use enums::{SamplingFrequency, StrategyLabel, ZoomPreset};
pub use error::CoreError;
pub use metrics::{MetricCondition, MetricSet};
pub use structs::{EventSpec, PricePoint, PriceSeries};
pub use window::{NormalizedWindow, WindowPoint, WindowTruncation};
