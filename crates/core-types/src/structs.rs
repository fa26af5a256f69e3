use crate::enums::SamplingFrequency;
use crate::error::CoreError;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single quoted close for one trading period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: Decimal,
}

/// An ordered, validated price history for one instrument.
///
/// Construction guarantees the series is non-empty, sorted by date with unique
/// dates, and that every price is strictly positive. The series is never
/// mutated afterwards; everything downstream derives new data from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPriceSeries")]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

/// The unvalidated wire shape handed over by the data collaborator.
#[derive(Deserialize)]
struct RawPriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl TryFrom<RawPriceSeries> for PriceSeries {
    type Error = CoreError;

    fn try_from(raw: RawPriceSeries) -> Result<Self, Self::Error> {
        PriceSeries::new(raw.symbol, raw.points)
    }
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, CoreError> {
        let symbol = symbol.into();
        let invalid = |reason: String| CoreError::InvalidSeries {
            symbol: symbol.clone(),
            reason,
        };

        if points.is_empty() {
            return Err(invalid("series contains no prices".to_string()));
        }
        if let Some(p) = points.iter().find(|p| p.price <= Decimal::ZERO) {
            return Err(invalid(format!("non-positive price {} on {}", p.price, p.date)));
        }
        if let Some(w) = points.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(invalid(format!(
                "dates must be strictly increasing, found {} after {}",
                w[1].date, w[0].date
            )));
        }

        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false` for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.first_date() <= date && date <= self.last_date()
    }

    /// Index of the quote on `date`, or of the latest quote strictly before it.
    pub fn index_on_or_before(&self, date: NaiveDate) -> Option<usize> {
        let after = self.points.partition_point(|p| p.date <= date);
        after.checked_sub(1)
    }

    pub fn sampling_frequency(&self) -> SamplingFrequency {
        let dates: Vec<NaiveDate> = self.points.iter().map(|p| p.date).collect();
        SamplingFrequency::infer(&dates)
    }
}

/// One event to study: a shock date and the calendar span to examine around it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSpec {
    pub event_id: String,
    pub event_date: NaiveDate,
    pub pre_window: Duration,
    pub post_window: Duration,
}

impl EventSpec {
    pub fn new(
        event_id: impl Into<String>,
        event_date: NaiveDate,
        pre_window: Duration,
        post_window: Duration,
    ) -> Result<Self, CoreError> {
        let event_id = event_id.into();
        if pre_window < Duration::zero() || post_window < Duration::zero() {
            return Err(CoreError::InvalidInput(
                format!("event '{}'", event_id),
                "pre_window and post_window must be non-negative".to_string(),
            ));
        }
        Ok(Self {
            event_id,
            event_date,
            pre_window,
            post_window,
        })
    }

    /// First calendar date of the requested window, saturating at the calendar's start.
    pub fn window_start(&self) -> NaiveDate {
        self.event_date
            .checked_sub_signed(self.pre_window)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar date of the requested window, saturating at the calendar's end.
    pub fn window_end(&self) -> NaiveDate {
        self.event_date
            .checked_add_signed(self.post_window)
            .unwrap_or(NaiveDate::MAX)
    }
}
