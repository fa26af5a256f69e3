use analyzer::{AnalysisFailure, StrategyReport};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use core_types::MetricSet;

fn pct(value: f64) -> String {
    format!("{:+.2}%", value * 100.0)
}

fn optional(value: Option<f64>, format: impl Fn(f64) -> String) -> String {
    value.map_or_else(|| "n/a".to_string(), format)
}

fn recovery(metrics: &MetricSet) -> String {
    match metrics.recovery_periods {
        Some(0) => "no dip".to_string(),
        Some(periods) => format!("{} periods", periods),
        None => "not recovered".to_string(),
    }
}

fn notes(metrics: &MetricSet) -> String {
    metrics
        .conditions
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Renders one event's metrics, labels, recommendations and failed pairs.
pub fn event_report(title: &str, report: &StrategyReport, failures: &[&AnalysisFailure]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            "Sector",
            "Pre return",
            "Post return",
            "Beta",
            "Volatility",
            "Max drawdown",
            "Recovery",
            "Labels",
            "Notes",
        ]);

    for row in &report.rows {
        let m = &row.metrics;
        table.add_row(vec![
            row.display_name.clone(),
            pct(m.pre_return),
            pct(m.post_return),
            optional(m.beta, |b| format!("{:.2}", b)),
            optional(m.volatility, pct),
            pct(m.max_drawdown),
            recovery(m),
            row.classification.to_string(),
            notes(m),
        ]);
    }

    let mut out = format!("{}\n{}\n", title, table);

    out.push_str("\nInvestor recommendations:\n");
    for line in report.recommendations() {
        out.push_str(&format!(" - {}\n", line));
    }

    if !failures.is_empty() {
        out.push_str("\nNo metrics for:\n");
        for failure in failures {
            out.push_str(&format!(" - {}: {}\n", failure.sector_id, failure.reason));
        }
    }
    out
}
