use crate::error::AnalyticsError;
use core_types::{EventSpec, NormalizedWindow, PriceSeries, WindowPoint, WindowTruncation};
use rust_decimal::prelude::*;

/// One series sliced to the event window and rescaled by its anchor quote.
struct AnchoredSlice {
    points: Vec<WindowPoint>,
    anchor_date: chrono::NaiveDate,
    truncation: WindowTruncation,
}

/// Extracts the normalized event window for a sector and its benchmark.
///
/// Both series must cover the event date. Each is anchored on its own quote for
/// the event date (or the nearest trading day before it), so offsets count
/// trading periods on each instrument's own calendar. Requested spans that run
/// past the available data are clipped and flagged on the returned window
/// rather than treated as errors.
pub fn extract_window(
    sector: &PriceSeries,
    benchmark: &PriceSeries,
    spec: &EventSpec,
) -> Result<NormalizedWindow, AnalyticsError> {
    let sector_slice = anchor_and_slice(sector, spec)?;
    let benchmark_slice = anchor_and_slice(benchmark, spec)?;

    // Beta pairs the two series, so a short benchmark clips the window as much
    // as a short sector does.
    let truncation = sector_slice.truncation.merge(benchmark_slice.truncation);
    if truncation.any() {
        tracing::debug!(
            event = %spec.event_id,
            sector = %sector.symbol(),
            benchmark = %benchmark.symbol(),
            pre = truncation.pre,
            post = truncation.post,
            "Event window truncated to available data."
        );
    }

    Ok(NormalizedWindow {
        event_id: spec.event_id.clone(),
        sector_id: sector.symbol().to_string(),
        benchmark_id: benchmark.symbol().to_string(),
        anchor_date: sector_slice.anchor_date,
        sector: sector_slice.points,
        benchmark: benchmark_slice.points,
        sector_frequency: sector.sampling_frequency(),
        truncation,
    })
}

fn anchor_and_slice(series: &PriceSeries, spec: &EventSpec) -> Result<AnchoredSlice, AnalyticsError> {
    if !series.contains_date(spec.event_date) {
        return Err(AnalyticsError::OutOfRangeEvent {
            event_id: spec.event_id.clone(),
            symbol: series.symbol().to_string(),
            event_date: spec.event_date,
            first: series.first_date(),
            last: series.last_date(),
        });
    }

    let anchor_idx = series
        .index_on_or_before(spec.event_date)
        .ok_or_else(|| AnalyticsError::NoPriorPrice {
            event_id: spec.event_id.clone(),
            symbol: series.symbol().to_string(),
            event_date: spec.event_date,
        })?;

    let points = series.points();
    let anchor = points[anchor_idx];
    let (window_start, window_end) = (spec.window_start(), spec.window_end());

    // The anchor is always part of the window, even when the event falls on a
    // non-trading day and the pre-event span is empty.
    let start_idx = points
        .partition_point(|p| p.date < window_start)
        .min(anchor_idx);
    let end_idx = points
        .partition_point(|p| p.date <= window_end)
        .max(anchor_idx + 1);

    let normalized = points[start_idx..end_idx]
        .iter()
        .enumerate()
        .map(|(i, p)| -> Result<WindowPoint, AnalyticsError> {
            let idx = start_idx + i;
            let ratio = if idx == anchor_idx {
                1.0
            } else {
                p.price
                    .checked_div(anchor.price)
                    .and_then(|r| r.to_f64())
                    .ok_or_else(|| AnalyticsError::Conversion {
                        symbol: series.symbol().to_string(),
                        date: p.date,
                        price: p.price.to_string(),
                    })?
            };
            Ok(WindowPoint {
                date: p.date,
                offset: idx as i64 - anchor_idx as i64,
                normalized: ratio,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AnchoredSlice {
        points: normalized,
        anchor_date: anchor.date,
        truncation: WindowTruncation {
            pre: window_start < series.first_date(),
            post: window_end > series.last_date(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use core_types::PricePoint;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 3, d).unwrap()
    }

    fn series(symbol: &str, quotes: &[(u32, Decimal)]) -> PriceSeries {
        let points = quotes
            .iter()
            .map(|(d, price)| PricePoint { date: day(*d), price: *price })
            .collect();
        PriceSeries::new(symbol, points).unwrap()
    }

    fn spec(event_day: u32, pre: i64, post: i64) -> EventSpec {
        EventSpec::new("shock", day(event_day), Duration::days(pre), Duration::days(post)).unwrap()
    }

    #[test]
    fn anchor_is_exactly_one() {
        let sector = series("XLE", &[(2, dec!(80)), (3, dec!(90)), (4, dec!(100)), (5, dec!(70))]);
        let bench = series("^GSPC", &[(2, dec!(3)), (3, dec!(3)), (4, dec!(3)), (5, dec!(3))]);

        let window = extract_window(&sector, &bench, &spec(4, 10, 10)).unwrap();
        let anchor = window.sector.iter().find(|p| p.offset == 0).unwrap();
        assert_eq!(anchor.normalized, 1.0);
        assert_eq!(anchor.date, day(4));
        assert!((window.sector[0].normalized - 0.8).abs() < 1e-12);
        assert!(window.benchmark.iter().all(|p| p.normalized == 1.0));
    }

    #[test]
    fn non_trading_event_day_anchors_on_previous_quote() {
        // Friday the 6th, then Monday the 9th.
        let sector = series("XLK", &[(5, dec!(50)), (6, dec!(40)), (9, dec!(44)), (10, dec!(48))]);
        let bench = series("^GSPC", &[(5, dec!(10)), (6, dec!(10)), (9, dec!(11)), (10, dec!(12))]);

        let window = extract_window(&sector, &bench, &spec(8, 0, 5)).unwrap();
        assert_eq!(window.anchor_date, day(6));
        let offsets: Vec<i64> = window.sector.iter().map(|p| p.offset).collect();
        // Offsets count quotes, not calendar days: the 9th is one period after the 6th.
        assert_eq!(offsets, vec![0, 1, 2]);
        assert!((window.sector[1].normalized - 1.1).abs() < 1e-12);
    }

    #[test]
    fn event_before_series_start_is_out_of_range() {
        let sector = series("XLF", &[(10, dec!(20)), (11, dec!(21))]);
        let bench = series("^GSPC", &[(1, dec!(1)), (11, dec!(1))]);

        let err = extract_window(&sector, &bench, &spec(5, 1, 1)).unwrap_err();
        match err {
            AnalyticsError::OutOfRangeEvent { symbol, first, last, .. } => {
                assert_eq!(symbol, "XLF");
                assert_eq!(first, day(10));
                assert_eq!(last, day(11));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn benchmark_must_also_cover_the_event() {
        let sector = series("XLF", &[(1, dec!(20)), (11, dec!(21))]);
        let bench = series("^GSPC", &[(6, dec!(1)), (11, dec!(1))]);

        let err = extract_window(&sector, &bench, &spec(5, 1, 1)).unwrap_err();
        assert!(matches!(err, AnalyticsError::OutOfRangeEvent { ref symbol, .. } if symbol == "^GSPC"));
    }

    #[test]
    fn short_post_window_is_truncated_not_rejected() {
        let sector = series("XLE", &[(2, dec!(10)), (3, dec!(11)), (4, dec!(12))]);
        let bench = series("^GSPC", &[(2, dec!(1)), (3, dec!(1)), (4, dec!(1))]);

        let window = extract_window(&sector, &bench, &spec(3, 0, 30)).unwrap();
        assert!(window.truncation.post);
        assert!(!window.truncation.pre);
        assert_eq!(window.sector.len(), 2);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let sector = series("XLE", &[(1, dec!(1)), (2, dec!(2)), (3, dec!(3)), (4, dec!(4)), (5, dec!(5))]);
        let bench = sector.clone();

        let window = extract_window(&sector, &bench, &spec(3, 1, 1)).unwrap();
        let dates: Vec<NaiveDate> = window.sector.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![day(2), day(3), day(4)]);
        assert!(!window.truncation.any());
    }

    #[test]
    fn short_benchmark_truncates_the_window() {
        let sector = series("XLE", &[(2, dec!(10)), (3, dec!(11)), (4, dec!(12)), (5, dec!(13)), (6, dec!(14))]);
        let bench = series("^GSPC", &[(2, dec!(1)), (3, dec!(1)), (4, dec!(1))]);

        let window = extract_window(&sector, &bench, &spec(3, 0, 3)).unwrap();
        assert_eq!(window.sector.len(), 4);
        assert_eq!(window.benchmark.len(), 2);
        assert!(window.truncation.post);
        assert!(!window.truncation.pre);
    }

    #[test]
    fn unchecked_negative_window_keeps_only_the_anchor() {
        let sector = series("XLE", &[(2, dec!(10)), (3, dec!(11)), (4, dec!(12)), (5, dec!(13))]);
        let bench = sector.clone();
        // Built directly, skipping the checks in `EventSpec::new`.
        let spec = EventSpec {
            event_id: "shock".to_string(),
            event_date: day(4),
            pre_window: Duration::days(-1),
            post_window: Duration::days(-2),
        };

        let window = extract_window(&sector, &bench, &spec).unwrap();
        assert_eq!(window.sector.len(), 1);
        assert_eq!(window.sector[0].offset, 0);
        assert_eq!(window.sector[0].normalized, 1.0);
    }
}
