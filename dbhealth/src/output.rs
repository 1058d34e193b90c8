//! Rendering of scan results for stdout.
//!
//! Everything printed here comes straight from the report types; no
//! severity or ordering decisions are made in the binary.

use clap::ValueEnum;
use dbhealth_core::quality::NullCounts;
use dbhealth_core::{HealthReport, Severity};
use serde::Serialize;
use std::fmt::Write as _;

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human readable summary
    #[default]
    Text,
    /// Pretty-printed JSON document
    Json,
}

/// Renders a health report in the requested format.
///
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn render_report(report: &HealthReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
    }
}

/// Text rendering: severity totals, one line per issue, scan time.
pub fn render_text(report: &HealthReport) -> String {
    let mut out = String::new();

    if report.all_good() {
        out.push_str("All good: no data-quality issues found\n");
    } else {
        let summary = report.summary();
        let totals = Severity::ALL
            .iter()
            .map(|severity| format!("{} {}", summary.get(*severity), severity))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "Found {} issues ({totals})", report.total_issues());

        for issue in report.issues_by_severity() {
            let _ = writeln!(
                out,
                "{}: {}",
                issue.severity().as_str().to_ascii_uppercase(),
                issue.description()
            );
        }
    }

    let _ = writeln!(out, "Scan time: {} ms", report.scan_time_ms());
    out
}

#[derive(Serialize)]
struct NullScanOutput<'a> {
    total_nulls: u64,
    tables: &'a NullCounts,
}

/// Renders the result of a quick null scan.
///
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn render_null_counts(counts: &NullCounts, format: OutputFormat) -> anyhow::Result<String> {
    let total_nulls = counts
        .values()
        .flat_map(|columns| columns.values())
        .fold(0u64, |acc, n| acc.saturating_add(*n));

    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&NullScanOutput {
            total_nulls,
            tables: counts,
        })?),
        OutputFormat::Text => {
            if counts.is_empty() {
                return Ok("No nulls found in key columns\n".to_string());
            }
            let mut out = String::new();
            for (table, columns) in counts {
                for (column, nulls) in columns {
                    let _ = writeln!(out, "{table}.{column}: {nulls} nulls");
                }
            }
            let _ = writeln!(out, "Total: {total_nulls} nulls");
            Ok(out)
        }
    }
}
