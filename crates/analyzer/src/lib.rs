//! # Aftershock Analyzer
//!
//! Orchestrates the pure engines into event studies.
//!
//! - `Analyzer` runs extraction, metric calculation and classification for each
//!   (event, sector) pair. Every call is a stateless request/response; re-running
//!   with a different `EventSpec` (for instance a `ZoomPreset`) is just another call.
//! - `StrategyReporter` groups the results of one event across sectors and picks
//!   the stand-out sector for each investor profile.

use crate::error::AnalyzerError;
use analytics::{AnalyticsError, MetricEngine, extract_window};
use configuration::ClassifierParams;
use core_types::{EventSpec, MetricSet, NormalizedWindow, PriceSeries, ZoomPreset};
use rayon::prelude::*;
use serde::Serialize;
use strategies::{Classification, StrategyClassifier};

pub mod error;
pub mod reporter;

pub use reporter::{Picks, SectorRow, StrategyReport, StrategyReporter};

/// Everything computed for one (event, sector) pair.
#[derive(Debug, Clone, Serialize)]
pub struct EventAnalysis {
    pub window: NormalizedWindow,
    pub metrics: MetricSet,
    pub classification: Classification,
}

/// Why an (event, sector) pair produced no metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureKind {
    OutOfRangeEvent,
    NoPriorPrice,
    InvalidData,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisFailure {
    pub event_id: String,
    pub sector_id: String,
    pub kind: FailureKind,
    pub reason: String,
}

/// The partial results of a batch: every pair lands in exactly one of the lists.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysisBatch {
    pub analyses: Vec<EventAnalysis>,
    pub failures: Vec<AnalysisFailure>,
}

impl AnalysisBatch {
    pub fn for_event<'a>(&'a self, event_id: &'a str) -> impl Iterator<Item = &'a EventAnalysis> + 'a {
        self.analyses
            .iter()
            .filter(move |a| a.metrics.event_id == event_id)
    }

    pub fn failures_for_event<'a>(
        &'a self,
        event_id: &'a str,
    ) -> impl Iterator<Item = &'a AnalysisFailure> + 'a {
        self.failures.iter().filter(move |f| f.event_id == event_id)
    }
}

/// The main analysis engine.
#[derive(Debug)]
pub struct Analyzer {
    engine: MetricEngine,
    classifier: StrategyClassifier,
}

impl Analyzer {
    pub fn new(params: &ClassifierParams) -> Result<Self, AnalyzerError> {
        Ok(Self {
            engine: MetricEngine::new(),
            classifier: StrategyClassifier::new(params)?,
        })
    }

    /// Extracts, measures and classifies one sector around one event.
    pub fn evaluate(
        &self,
        spec: &EventSpec,
        sector: &PriceSeries,
        benchmark: &PriceSeries,
    ) -> Result<EventAnalysis, AnalyzerError> {
        let window = extract_window(sector, benchmark, spec)?;
        let metrics = self.engine.calculate(&window);
        let classification = self.classifier.classify(&metrics);

        Ok(EventAnalysis {
            window,
            metrics,
            classification,
        })
    }

    /// Re-evaluates a pair with the window narrowed to a zoom preset.
    pub fn zoom(
        &self,
        spec: &EventSpec,
        preset: ZoomPreset,
        sector: &PriceSeries,
        benchmark: &PriceSeries,
    ) -> Result<EventAnalysis, AnalyzerError> {
        self.evaluate(&preset.apply(spec), sector, benchmark)
    }

    /// Evaluates every (event, sector) pair in parallel.
    ///
    /// A failing pair is recorded and skipped; it never stops the others. Results
    /// keep event order, then sector order, regardless of scheduling.
    pub fn run(
        &self,
        events: &[EventSpec],
        sectors: &[PriceSeries],
        benchmark: &PriceSeries,
    ) -> AnalysisBatch {
        let pairs: Vec<(&EventSpec, &PriceSeries)> = events
            .iter()
            .flat_map(|event| sectors.iter().map(move |sector| (event, sector)))
            .collect();

        tracing::info!(
            events = events.len(),
            sectors = sectors.len(),
            threads = rayon::current_num_threads(),
            "Starting event-study batch."
        );

        let results: Vec<_> = pairs
            .par_iter()
            .map(|(event, sector)| (*event, *sector, self.evaluate(event, sector, benchmark)))
            .collect();

        let mut batch = AnalysisBatch::default();
        for (event, sector, result) in results {
            match result {
                Ok(analysis) => batch.analyses.push(analysis),
                Err(e) => {
                    tracing::warn!(
                        event = %event.event_id,
                        sector = %sector.symbol(),
                        error = %e,
                        "Skipping pair with no metrics."
                    );
                    batch.failures.push(AnalysisFailure {
                        event_id: event.event_id.clone(),
                        sector_id: sector.symbol().to_string(),
                        kind: failure_kind(&e),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            completed = batch.analyses.len(),
            failed = batch.failures.len(),
            "Event-study batch finished."
        );

        batch
    }
}

fn failure_kind(error: &AnalyzerError) -> FailureKind {
    match error {
        AnalyzerError::Analytics(AnalyticsError::OutOfRangeEvent { .. }) => FailureKind::OutOfRangeEvent,
        AnalyzerError::Analytics(AnalyticsError::NoPriorPrice { .. }) => FailureKind::NoPriorPrice,
        _ => FailureKind::InvalidData,
    }
}
