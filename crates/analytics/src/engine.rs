use core_types::{MetricCondition, MetricSet, NormalizedWindow, WindowPoint};

/// Benchmark return variance below this is treated as a flat benchmark.
const MIN_BENCHMARK_VARIANCE: f64 = 1e-18;

/// Minimum number of paired return observations for a meaningful regression.
const MIN_BETA_OBSERVATIONS: usize = 3;

/// A stateless calculator for deriving event-study metrics from a normalized window.
#[derive(Debug, Default)]
pub struct MetricEngine {}

impl MetricEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating the metrics of one (event, sector) pair.
    ///
    /// Shortfalls in the data never fail the calculation: the affected field is
    /// left empty and the reason is recorded in `MetricSet::conditions`.
    pub fn calculate(&self, window: &NormalizedWindow) -> MetricSet {
        let mut conditions = Vec::new();

        if window.truncation.any() {
            conditions.push(MetricCondition::TruncatedWindow {
                pre: window.truncation.pre,
                post: window.truncation.post,
            });
        }

        let (pre_return, post_return) = self.calculate_returns(&window.sector);
        let beta = self.calculate_beta(window, &mut conditions);
        let volatility = self.calculate_volatility(window, &mut conditions);

        let post_event = window.post_event();
        let max_drawdown = max_drawdown(post_event);
        let recovery_periods = recovery_periods(post_event);

        tracing::debug!(
            event = %window.event_id,
            sector = %window.sector_id,
            pre_return,
            post_return,
            ?beta,
            ?volatility,
            max_drawdown,
            ?recovery_periods,
            "Calculated event metrics."
        );

        MetricSet {
            event_id: window.event_id.clone(),
            sector_id: window.sector_id.clone(),
            pre_return,
            post_return,
            beta,
            volatility,
            max_drawdown,
            recovery_periods,
            conditions,
        }
    }

    /// Returns measured against the event-date level of 1.0 at each end of the window.
    fn calculate_returns(&self, sector: &[WindowPoint]) -> (f64, f64) {
        let pre = sector.first().map_or(0.0, |p| p.normalized - 1.0);
        let post = sector.last().map_or(0.0, |p| p.normalized - 1.0);
        (pre, post)
    }

    /// OLS slope of sector returns on benchmark returns over the whole window.
    fn calculate_beta(
        &self,
        window: &NormalizedWindow,
        conditions: &mut Vec<MetricCondition>,
    ) -> Option<f64> {
        let pairs = window.paired_returns();
        if pairs.len() < MIN_BETA_OBSERVATIONS {
            conditions.push(MetricCondition::InsufficientData {
                metric: "beta".to_string(),
                observations: pairs.len(),
            });
            return None;
        }

        let n = pairs.len() as f64;
        let mean_sector = pairs.iter().map(|(s, _)| s).sum::<f64>() / n;
        let mean_bench = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

        let (covariance, variance) = pairs.iter().fold((0.0, 0.0), |(cov, var), (s, b)| {
            let db = b - mean_bench;
            (cov + (s - mean_sector) * db, var + db * db)
        });

        if variance < MIN_BENCHMARK_VARIANCE {
            conditions.push(MetricCondition::DegenerateBenchmark);
            return None;
        }

        Some(covariance / variance)
    }

    /// Annualized sample standard deviation of sector period returns.
    fn calculate_volatility(
        &self,
        window: &NormalizedWindow,
        conditions: &mut Vec<MetricCondition>,
    ) -> Option<f64> {
        let returns = window.sector_returns();
        if returns.len() < 2 {
            conditions.push(MetricCondition::InsufficientData {
                metric: "volatility".to_string(),
                observations: returns.len(),
            });
            return None;
        }

        let n = returns.len() as f64;
        let mean = returns.iter().sum::<f64>() / n;
        let variance = returns.iter().map(|r| (r - mean) * (r - mean)).sum::<f64>() / (n - 1.0);

        Some(variance.sqrt() * window.sector_frequency.periods_per_year().sqrt())
    }
}

/// Largest peak-to-trough decline, as a positive fraction, over the given points.
fn max_drawdown(points: &[WindowPoint]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };

    let mut peak = first.normalized;
    let mut worst: f64 = 0.0;
    for point in points {
        if point.normalized > peak {
            peak = point.normalized;
        }
        worst = worst.max(1.0 - point.normalized / peak);
    }
    worst
}

/// Periods after the event until the price first climbs back to its event-date
/// level following a dip below it.
///
/// `Some(0)` if the price never dipped, `None` if it dipped and never came back.
fn recovery_periods(post_event: &[WindowPoint]) -> Option<usize> {
    let mut dipped = false;
    for point in post_event.iter().filter(|p| p.offset > 0) {
        if point.normalized < 1.0 {
            dipped = true;
        } else if dipped {
            return Some(point.offset as usize);
        }
    }
    if dipped { None } else { Some(0) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::extract_window;
    use chrono::{Duration, NaiveDate};
    use core_types::{EventSpec, PricePoint, PriceSeries, SamplingFrequency, WindowTruncation};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const EPS: f64 = 1e-9;

    fn window(sector: &[f64], benchmark: &[f64], anchor: usize) -> NormalizedWindow {
        let points = |values: &[f64]| -> Vec<WindowPoint> {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| WindowPoint {
                    date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap() + Duration::days(i as i64),
                    offset: i as i64 - anchor as i64,
                    normalized: *v,
                })
                .collect()
        };
        NormalizedWindow {
            event_id: "test".to_string(),
            sector_id: "XLE".to_string(),
            benchmark_id: "^GSPC".to_string(),
            anchor_date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap() + Duration::days(anchor as i64),
            sector: points(sector),
            benchmark: points(benchmark),
            sector_frequency: SamplingFrequency::Daily,
            truncation: WindowTruncation::default(),
        }
    }

    fn series(symbol: &str, prices: &[Decimal]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2022, 2, 1).unwrap();
        let points = prices
            .iter()
            .enumerate()
            .map(|(i, price)| PricePoint { date: start + Duration::days(i as i64), price: *price })
            .collect();
        PriceSeries::new(symbol, points).unwrap()
    }

    /// Cumulative normalized levels from a list of period returns, anchored at index 0.
    fn levels(returns: &[f64]) -> Vec<f64> {
        let mut out = vec![1.0];
        for r in returns {
            let last = out[out.len() - 1];
            out.push(last * (1.0 + r));
        }
        out
    }

    #[test]
    fn shock_and_recovery_scenario() {
        let sector = series(
            "XLE",
            &[dec!(80), dec!(90), dec!(100), dec!(70), dec!(85), dec!(100), dec!(110)],
        );
        let benchmark = series("^GSPC", &[dec!(4000); 7]);
        let event_date = sector.points()[2].date;
        let spec = EventSpec::new("scenario", event_date, Duration::days(2), Duration::days(4)).unwrap();

        let window = extract_window(&sector, &benchmark, &spec).unwrap();
        let metrics = MetricEngine::new().calculate(&window);

        assert!((metrics.pre_return - -0.20).abs() < EPS);
        assert!((metrics.post_return - 0.10).abs() < EPS);
        assert!((metrics.max_drawdown - 0.30).abs() < EPS);
        assert_eq!(metrics.recovery_periods, Some(3));
        // A flat benchmark leaves beta undefined rather than zero.
        assert_eq!(metrics.beta, None);
        assert!(metrics.conditions.contains(&MetricCondition::DegenerateBenchmark));
        assert!(!metrics.is_truncated());
    }

    #[test]
    fn beta_of_a_leveraged_sector() {
        let bench_returns = [0.01, 0.02, 0.03, -0.01, 0.005];
        let sector_returns: Vec<f64> = bench_returns.iter().map(|r| 2.0 * r).collect();
        let w = window(&levels(&sector_returns), &levels(&bench_returns), 0);

        let metrics = MetricEngine::new().calculate(&w);
        assert!((metrics.beta.unwrap() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn beta_needs_three_paired_returns() {
        let w = window(&[1.0, 1.1, 1.2], &[1.0, 1.05, 1.0], 0);
        let metrics = MetricEngine::new().calculate(&w);

        assert_eq!(metrics.beta, None);
        assert!(metrics.conditions.contains(&MetricCondition::InsufficientData {
            metric: "beta".to_string(),
            observations: 2,
        }));
        // The rest of the set is still computed.
        assert!((metrics.post_return - 0.2).abs() < EPS);
        assert!(metrics.volatility.is_some());
    }

    #[test]
    fn volatility_is_annualized_by_sampling_frequency() {
        let sector = [0.9, 0.95, 1.0, 1.02, 0.97, 1.01];
        let bench = [1.0; 6];
        let daily = window(&sector, &bench, 2);
        let mut weekly = daily.clone();
        weekly.sector_frequency = SamplingFrequency::Weekly;

        let engine = MetricEngine::new();
        let vol_daily = engine.calculate(&daily).volatility.unwrap();
        let vol_weekly = engine.calculate(&weekly).volatility.unwrap();
        assert!(vol_daily > 0.0);
        assert!((vol_daily / vol_weekly - (252.0_f64 / 52.0).sqrt()).abs() < EPS);
    }

    #[test]
    fn volatility_of_constant_returns_is_zero() {
        let w = window(&levels(&[0.01, 0.01, 0.01]), &[1.0; 4], 0);
        let vol = MetricEngine::new().calculate(&w).volatility.unwrap();
        assert!(vol.abs() < 1e-9);
    }

    #[test]
    fn volatility_needs_two_returns() {
        let w = window(&[1.0, 1.1], &[1.0, 1.0], 0);
        let metrics = MetricEngine::new().calculate(&w);
        assert_eq!(metrics.volatility, None);
    }

    #[test]
    fn drawdown_ignores_pre_event_declines() {
        // Falls from 2.0 to 1.0 before the event, then only rises.
        let w = window(&[2.0, 1.5, 1.0, 1.1, 1.2], &[1.0; 5], 2);
        let metrics = MetricEngine::new().calculate(&w);
        assert_eq!(metrics.max_drawdown, 0.0);
        assert_eq!(metrics.recovery_periods, Some(0));
    }

    #[test]
    fn drawdown_measured_from_post_event_peak() {
        // Rises to 1.5 after the event, then falls to 0.75: a 50% decline.
        let w = window(&[1.0, 1.5, 0.75, 0.9], &[1.0; 4], 0);
        let dd = MetricEngine::new().calculate(&w).max_drawdown;
        assert!((dd - 0.5).abs() < EPS);
        assert!((0.0..1.0).contains(&dd));
    }

    #[test]
    fn unrecovered_dip_has_no_recovery_period() {
        let w = window(&[1.1, 1.0, 0.8, 0.9, 0.95], &[1.0; 5], 1);
        let metrics = MetricEngine::new().calculate(&w);
        assert_eq!(metrics.recovery_periods, None);
    }

    #[test]
    fn recovery_offset_is_first_return_to_baseline() {
        let sector = [1.2, 1.1, 1.0, 0.7, 0.9, 1.3, 0.8, 1.4];
        let w = window(&sector, &[1.0; 8], 2);
        let periods = MetricEngine::new().calculate(&w).recovery_periods.unwrap();
        assert_eq!(periods, 3);

        let post = w.post_event();
        assert!(post[periods].normalized >= 1.0);
        assert!(post[1..periods].iter().any(|p| p.normalized < 1.0));
    }

    #[test]
    fn truncation_is_carried_as_a_condition() {
        let mut w = window(&[1.0, 0.9, 0.95], &[1.0, 1.01, 1.02], 0);
        w.truncation.post = true;
        let metrics = MetricEngine::new().calculate(&w);
        assert!(metrics.is_truncated());
    }

    #[test]
    fn identical_inputs_give_identical_metrics() {
        let w = window(&[0.93, 1.0, 0.88, 0.97, 1.04], &[0.99, 1.0, 0.97, 1.01, 1.03], 1);
        let engine = MetricEngine::new();
        assert_eq!(engine.calculate(&w), engine.calculate(&w));
    }
}
