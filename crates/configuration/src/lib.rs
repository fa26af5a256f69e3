use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{ClassifierParams, Config, DataSource, EventEntry, Instrument, WindowParams};

/// Loads the application configuration from a TOML file.
///
/// Values can be overridden from the environment with the `AFTERSHOCK` prefix,
/// e.g. `AFTERSHOCK_CLASSIFIER__RETURN_THRESHOLD=0.1`. The result is validated
/// before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(
            config::Environment::with_prefix("AFTERSHOCK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    finish(builder)
}

/// Parses configuration from an in-memory TOML document.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        sectors = config.sectors.len(),
        events = config.events.len(),
        benchmark = %config.benchmark.symbol,
        "Configuration loaded."
    );

    Ok(config)
}
