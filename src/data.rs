use anyhow::{Context, Result};
use core_types::PriceSeries;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};

/// Path of the price file for `symbol` inside the data directory.
pub fn price_file(directory: &Path, symbol: &str) -> PathBuf {
    directory.join(format!("{}.json", symbol))
}

/// Reads one instrument's price history as written by the data collaborator.
pub fn load_series(directory: &Path, symbol: &str) -> Result<PriceSeries> {
    let path = price_file(directory, symbol);
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read price file {}", path.display()))?;
    let series: PriceSeries = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse price file {}", path.display()))?;

    if series.symbol() != symbol {
        anyhow::bail!(
            "Price file {} holds '{}' but '{}' was expected",
            path.display(),
            series.symbol(),
            symbol
        );
    }
    Ok(series)
}

/// Loads every sector, skipping (and reporting) the ones that cannot be read.
pub fn load_sectors(directory: &Path, symbols: &[String]) -> Result<(Vec<PriceSeries>, Vec<(String, anyhow::Error)>)> {
    let progress_bar = ProgressBar::new(symbols.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut loaded = Vec::new();
    let mut skipped = Vec::new();
    for symbol in symbols {
        progress_bar.set_message(format!("Loading {}...", symbol));
        match load_series(directory, symbol) {
            Ok(series) => {
                tracing::debug!(symbol = %symbol, points = series.len(), "Loaded price series.");
                loaded.push(series);
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Skipping sector without usable prices.");
                skipped.push((symbol.clone(), e));
            }
        }
        progress_bar.inc(1);
    }
    progress_bar.finish_and_clear();

    Ok((loaded, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, symbol: &str, body: &str) {
        fs::write(price_file(dir.path(), symbol), body).unwrap();
    }

    #[test]
    fn loads_valid_price_file() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            "XLE",
            r#"{"symbol":"XLE","points":[{"date":"2020-03-13","price":"35.1"},{"date":"2020-03-16","price":"31.9"}]}"#,
        );

        let series = load_series(dir.path(), "XLE").unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn rejects_mismatched_symbol() {
        let dir = TempDir::new().unwrap();
        write(&dir, "XLK", r#"{"symbol":"XLF","points":[{"date":"2020-03-13","price":"1"}]}"#);

        assert!(load_series(dir.path(), "XLK").is_err());
    }

    #[test]
    fn unreadable_sectors_are_skipped() {
        let dir = TempDir::new().unwrap();
        write(&dir, "XLE", r#"{"symbol":"XLE","points":[{"date":"2020-03-13","price":"35.1"}]}"#);
        write(&dir, "XLF", r#"{"symbol":"XLF","points":[]}"#);

        let symbols = vec!["XLE".to_string(), "XLF".to_string(), "XLK".to_string()];
        let (loaded, skipped) = load_sectors(dir.path(), &symbols).unwrap();

        assert_eq!(loaded.len(), 1);
        let names: Vec<&str> = skipped.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(names, vec!["XLF", "XLK"]);
    }
}
