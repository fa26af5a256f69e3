use crate::error::ConfigError;
use chrono::{Duration, NaiveDate};
use core_types::EventSpec;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub data: DataSource,
    /// The instrument every sector is measured against.
    pub benchmark: Instrument,
    pub sectors: Vec<Instrument>,
    #[serde(default)]
    pub window: WindowParams,
    pub events: Vec<EventEntry>,
    #[serde(default)]
    pub classifier: ClassifierParams,
}

/// Where the data collaborator has left the price files.
#[derive(Debug, Clone, Deserialize)]
pub struct DataSource {
    /// Directory holding one `<symbol>.json` price file per instrument.
    pub directory: PathBuf,
}

/// A tradable instrument and its display name.
#[derive(Debug, Clone, Deserialize)]
pub struct Instrument {
    pub symbol: String,
    /// Human-readable name for reports, e.g. "Energy (XLE)".
    pub label: Option<String>,
}

impl Instrument {
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.symbol)
    }
}

/// The default calendar span examined around every event.
#[derive(Debug, Clone, Deserialize)]
pub struct WindowParams {
    pub pre_days: i64,
    pub post_days: i64,
}

/// A shock event to study.
#[derive(Debug, Clone, Deserialize)]
pub struct EventEntry {
    pub id: String,
    pub label: Option<String>,
    pub date: NaiveDate,
    /// Overrides `window.pre_days` for this event.
    pub pre_days: Option<i64>,
    /// Overrides `window.post_days` for this event.
    pub post_days: Option<i64>,
}

impl EventEntry {
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}

/// Thresholds for the rule-based strategy classifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierParams {
    /// Highest annualized volatility that still counts as low-volatility.
    pub volatility_threshold: f64,
    /// Post-event drawdown must stay below this for the Defensive label.
    pub max_drawdown_cap: f64,
    /// Minimum post-event return for the Growth label.
    pub return_threshold: f64,
    /// Maximum periods to recover for the Fast Recovery label.
    pub recovery_threshold: usize,
}

// --- Default Implementations ---
// These allow a user to omit the `[data]`, `[window]` or `[classifier]`
// sections from their toml and still have it work with sensible defaults.

impl Default for DataSource {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("data"),
        }
    }
}

impl Default for WindowParams {
    fn default() -> Self {
        // Five calendar years either side of the event.
        Self {
            pre_days: 1825,
            post_days: 1825,
        }
    }
}

impl Default for ClassifierParams {
    fn default() -> Self {
        Self {
            volatility_threshold: 0.20,
            max_drawdown_cap: 0.10,
            return_threshold: 0.05,
            recovery_threshold: 20,
        }
    }
}

impl Config {
    /// Checks the cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sectors.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one sector must be configured".to_string(),
            ));
        }
        if self.events.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one event must be configured".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for sector in &self.sectors {
            if !seen.insert(sector.symbol.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "sector '{}' is listed more than once",
                    sector.symbol
                )));
            }
            if sector.symbol == self.benchmark.symbol {
                return Err(ConfigError::ValidationError(format!(
                    "benchmark '{}' cannot also be a sector",
                    sector.symbol
                )));
            }
        }

        let mut event_ids = HashSet::new();
        for event in &self.events {
            if !event_ids.insert(event.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "event id '{}' is used more than once",
                    event.id
                )));
            }
        }

        Ok(())
    }

    /// Builds an `EventSpec` for every configured event, applying per-event overrides.
    pub fn event_specs(&self) -> Result<Vec<EventSpec>, ConfigError> {
        self.events
            .iter()
            .map(|event| -> Result<EventSpec, ConfigError> {
                let pre = event.pre_days.unwrap_or(self.window.pre_days);
                let post = event.post_days.unwrap_or(self.window.post_days);
                let span = |days: i64| {
                    Duration::try_days(days).ok_or_else(|| {
                        ConfigError::ValidationError(format!(
                            "event '{}': window of {} days is out of range",
                            event.id, days
                        ))
                    })
                };
                Ok(EventSpec::new(event.id.clone(), event.date, span(pre)?, span(post)?)?)
            })
            .collect()
    }

    /// Display name for any configured symbol, falling back to the symbol itself.
    pub fn label_for<'a>(&'a self, symbol: &'a str) -> &'a str {
        std::iter::once(&self.benchmark)
            .chain(self.sectors.iter())
            .find(|i| i.symbol == symbol)
            .map_or(symbol, |i| i.display_name())
    }

    pub fn event(&self, id: &str) -> Option<&EventEntry> {
        self.events.iter().find(|e| e.id == id)
    }
}
