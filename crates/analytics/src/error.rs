use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error(
        "Event '{event_id}' on {event_date} is outside the range of '{symbol}' ({first} to {last})"
    )]
    OutOfRangeEvent {
        event_id: String,
        symbol: String,
        event_date: NaiveDate,
        first: NaiveDate,
        last: NaiveDate,
    },

    #[error("No price for '{symbol}' on or before {event_date} to anchor event '{event_id}'")]
    NoPriorPrice {
        event_id: String,
        symbol: String,
        event_date: NaiveDate,
    },

    #[error("Price {price} for '{symbol}' on {date} cannot be converted to a ratio")]
    Conversion {
        symbol: String,
        date: NaiveDate,
        price: String,
    },
}
