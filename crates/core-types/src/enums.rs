use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::structs::EventSpec;

/// The qualitative, investor-style labels a metric set can earn.
///
/// The ordering is the order labels are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StrategyLabel {
    Defensive,
    Growth,
    FastRecovery,
    Neutral,
}

impl fmt::Display for StrategyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyLabel::Defensive => "Defensive",
            StrategyLabel::Growth => "Growth",
            StrategyLabel::FastRecovery => "Fast Recovery",
            StrategyLabel::Neutral => "Neutral",
        };
        f.write_str(name)
    }
}

/// Sampling frequency of a price series, inferred from its date spacing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl SamplingFrequency {
    /// Number of sampling periods in a trading year, used to annualize volatility.
    pub fn periods_per_year(&self) -> f64 {
        match self {
            SamplingFrequency::Daily => 252.0,
            SamplingFrequency::Weekly => 52.0,
            SamplingFrequency::Monthly => 12.0,
        }
    }

    /// Infers the frequency from the median calendar gap between consecutive dates.
    ///
    /// Weekends and holidays stretch individual gaps of a daily series, which is
    /// why the median rather than the mean is used. Fewer than two dates default
    /// to `Daily`.
    pub fn infer(dates: &[NaiveDate]) -> Self {
        let mut gaps: Vec<i64> = dates
            .windows(2)
            .map(|w| (w[1] - w[0]).num_days())
            .collect();
        if gaps.is_empty() {
            return SamplingFrequency::Daily;
        }
        gaps.sort_unstable();

        let mid = gaps.len() / 2;
        let median = if gaps.len() % 2 == 0 {
            (gaps[mid - 1] + gaps[mid]) as f64 / 2.0
        } else {
            gaps[mid] as f64
        };

        if median <= 4.0 {
            SamplingFrequency::Daily
        } else if median <= 10.0 {
            SamplingFrequency::Weekly
        } else {
            SamplingFrequency::Monthly
        }
    }
}

/// Preset window sizes offered when re-examining an event at a tighter range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ZoomPreset {
    /// ±1 day
    Day,
    /// ±1 week
    Week,
    /// ±1 month (~30 days)
    Month,
    /// ±3 months (~90 days)
    Quarter,
    /// ±6 months (~180 days)
    HalfYear,
    /// ±1 year (~365 days)
    Year,
    /// The full configured window
    Full,
}

impl ZoomPreset {
    pub const ALL: [ZoomPreset; 7] = [
        ZoomPreset::Day,
        ZoomPreset::Week,
        ZoomPreset::Month,
        ZoomPreset::Quarter,
        ZoomPreset::HalfYear,
        ZoomPreset::Year,
        ZoomPreset::Full,
    ];

    /// The half-width of the preset in calendar days, `None` for `Full`.
    pub fn days(&self) -> Option<i64> {
        match self {
            ZoomPreset::Day => Some(1),
            ZoomPreset::Week => Some(7),
            ZoomPreset::Month => Some(30),
            ZoomPreset::Quarter => Some(90),
            ZoomPreset::HalfYear => Some(180),
            ZoomPreset::Year => Some(365),
            ZoomPreset::Full => None,
        }
    }

    /// Returns a fresh spec whose windows are narrowed to this preset.
    ///
    /// A preset never widens a window beyond what the base spec asked for.
    pub fn apply(&self, spec: &EventSpec) -> EventSpec {
        let Some(days) = self.days() else {
            return spec.clone();
        };
        let span = Duration::days(days);
        EventSpec {
            event_id: spec.event_id.clone(),
            event_date: spec.event_date,
            pre_window: spec.pre_window.min(span),
            post_window: spec.post_window.min(span),
        }
    }
}

impl fmt::Display for ZoomPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.days() {
            Some(days) => write!(f, "±{} days", days),
            None => f.write_str("full window"),
        }
    }
}
