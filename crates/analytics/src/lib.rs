//! # Aftershock Analytics Engine
//!
//! Turns raw price histories into event-study metrics.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files,
//!   networks or presentation. It depends only on `core-types` (Layer 0).
//! - **Stateless Calculation:** `extract_window` and `MetricEngine` are pure
//!   functions of their inputs. Identical inputs give bit-for-bit identical output.
//!
//! ## Public API
//!
//! - `extract_window`: slices and normalizes a sector/benchmark pair around an event.
//! - `MetricEngine`: computes the `MetricSet` for a normalized window.
//! - `AnalyticsError`: the per-event failures (out-of-range event, missing anchor).

pub mod engine;
pub mod error;
pub mod window;

pub use engine::MetricEngine;
pub use error::AnalyticsError;
pub use window::extract_window;
