use crate::enums::SamplingFrequency;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One normalized observation inside an event window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowPoint {
    pub date: NaiveDate,
    /// Trading periods relative to the anchor; negative before the event.
    pub offset: i64,
    /// Price divided by the anchor price, exactly 1.0 at offset 0.
    pub normalized: f64,
}

/// Which ends of the requested window ran past the available data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowTruncation {
    pub pre: bool,
    pub post: bool,
}

impl WindowTruncation {
    pub fn any(&self) -> bool {
        self.pre || self.post
    }

    /// A side is truncated if either series ran out of data on it.
    pub fn merge(self, other: WindowTruncation) -> WindowTruncation {
        WindowTruncation {
            pre: self.pre || other.pre,
            post: self.post || other.post,
        }
    }
}

/// The sector and benchmark slices around one event, each anchored to 1.0 on
/// its own event-date quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWindow {
    pub event_id: String,
    pub sector_id: String,
    pub benchmark_id: String,
    /// The sector's quote date used as the anchor (the event date or the
    /// nearest trading day before it).
    pub anchor_date: NaiveDate,
    pub sector: Vec<WindowPoint>,
    pub benchmark: Vec<WindowPoint>,
    /// Frequency inferred from the full source sector series.
    pub sector_frequency: SamplingFrequency,
    pub truncation: WindowTruncation,
}

impl NormalizedWindow {
    /// Sector points from the anchor onwards.
    pub fn post_event(&self) -> &[WindowPoint] {
        let start = self.sector.partition_point(|p| p.offset < 0);
        &self.sector[start..]
    }

    /// Sector period-over-period returns across the whole window.
    pub fn sector_returns(&self) -> Vec<f64> {
        period_returns(&self.sector)
    }

    /// Period-over-period `(sector, benchmark)` return pairs.
    ///
    /// The two calendars are joined on date first so that each pair covers the
    /// same span of time for both instruments.
    pub fn paired_returns(&self) -> Vec<(f64, f64)> {
        let benchmark: HashMap<NaiveDate, f64> = self
            .benchmark
            .iter()
            .map(|p| (p.date, p.normalized))
            .collect();

        let joined: Vec<(f64, f64)> = self
            .sector
            .iter()
            .filter_map(|p| benchmark.get(&p.date).map(|b| (p.normalized, *b)))
            .collect();

        joined
            .windows(2)
            .map(|w| (w[1].0 / w[0].0 - 1.0, w[1].1 / w[0].1 - 1.0))
            .collect()
    }
}

fn period_returns(points: &[WindowPoint]) -> Vec<f64> {
    points
        .windows(2)
        .map(|w| w[1].normalized / w[0].normalized - 1.0)
        .collect()
}
