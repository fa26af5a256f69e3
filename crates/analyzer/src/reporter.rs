use crate::{AnalysisBatch, EventAnalysis};
use core_types::{EventSpec, MetricSet};
use serde::Serialize;
use std::collections::HashMap;
use strategies::Classification;

/// One sector's line in an event report.
#[derive(Debug, Clone, Serialize)]
pub struct SectorRow {
    pub sector_id: String,
    pub display_name: String,
    pub metrics: MetricSet,
    pub classification: Classification,
}

/// The stand-out sector for each investor profile, by display name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Picks {
    /// Lowest post-event volatility.
    pub defensive: Option<String>,
    /// Highest post-event return.
    pub growth: Option<String>,
    /// Fewest periods to recover; `None` if no sector recovered.
    pub fast_recovery: Option<String>,
}

/// Cross-sector summary of one event.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyReport {
    pub event_id: String,
    pub rows: Vec<SectorRow>,
    pub picks: Picks,
}

impl StrategyReport {
    /// Investor-style recommendation sentences for the picks.
    pub fn recommendations(&self) -> Vec<String> {
        if self.rows.is_empty() {
            return vec!["No strategy summary available for this window.".to_string()];
        }

        let mut lines = Vec::new();
        if let Some(name) = &self.picks.defensive {
            lines.push(format!(
                "Defensive investor: consider {} (lowest volatility in this window).",
                name
            ));
        }
        if let Some(name) = &self.picks.growth {
            lines.push(format!(
                "Growth-seeking investor: consider {} (highest post-event return in this window).",
                name
            ));
        }
        match &self.picks.fast_recovery {
            Some(name) => lines.push(format!(
                "Focused on quick recovery: consider {} (fastest return to the event-day level in this window).",
                name
            )),
            None => lines.push(
                "No sector recovered to its event-day level within this window.".to_string(),
            ),
        }
        lines
    }
}

/// Builds per-event strategy reports from analysed pairs.
#[derive(Debug, Clone, Default)]
pub struct StrategyReporter {
    display_names: HashMap<String, String>,
}

impl StrategyReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses human-readable names instead of symbols in rows and picks.
    pub fn with_display_names<I, K, V>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.display_names
            .extend(names.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn build<'a, I>(&self, event_id: &str, analyses: I) -> StrategyReport
    where
        I: IntoIterator<Item = &'a EventAnalysis>,
    {
        let rows: Vec<SectorRow> = analyses
            .into_iter()
            .filter(|a| a.metrics.event_id == event_id)
            .map(|a| SectorRow {
                sector_id: a.metrics.sector_id.clone(),
                display_name: self.display_name(&a.metrics.sector_id),
                metrics: a.metrics.clone(),
                classification: a.classification.clone(),
            })
            .collect();

        let picks = Picks {
            defensive: best(&rows, |m| m.volatility, Prefer::Lowest),
            growth: best(&rows, |m| Some(m.post_return), Prefer::Highest),
            fast_recovery: best(&rows, |m| m.recovery_periods.map(|p| p as f64), Prefer::Lowest),
        };

        StrategyReport {
            event_id: event_id.to_string(),
            rows,
            picks,
        }
    }

    /// One report per event, in the order the events are given.
    pub fn build_all(&self, batch: &AnalysisBatch, events: &[EventSpec]) -> Vec<StrategyReport> {
        events
            .iter()
            .map(|event| self.build(&event.event_id, batch.for_event(&event.event_id)))
            .collect()
    }

    fn display_name(&self, symbol: &str) -> String {
        self.display_names
            .get(symbol)
            .cloned()
            .unwrap_or_else(|| symbol.to_string())
    }
}

#[derive(Clone, Copy)]
enum Prefer {
    Lowest,
    Highest,
}

/// The row with the best available value of `key`; the first row wins ties.
fn best<F>(rows: &[SectorRow], key: F, prefer: Prefer) -> Option<String>
where
    F: Fn(&MetricSet) -> Option<f64>,
{
    let mut chosen: Option<(&SectorRow, f64)> = None;
    for row in rows {
        let Some(value) = key(&row.metrics).filter(|v| !v.is_nan()) else {
            continue;
        };
        let better = match (chosen, prefer) {
            (None, _) => true,
            (Some((_, current)), Prefer::Lowest) => value < current,
            (Some((_, current)), Prefer::Highest) => value > current,
        };
        if better {
            chosen = Some((row, value));
        }
    }
    chosen.map(|(row, _)| row.display_name.clone())
}
