//! The `summarize` and `thresholds` commands.

use crate::source::InputArgs;
use log::info;
use std::fmt::Write;
use wq_core::{ingest::Ingestion, threshold::ThresholdTable};
use wq_data::report::Report;
use wq_utils::dates::format_timestamp;

/// Ingest, build the report for the requested window and print it.
pub async fn run_summarize(
    input: &InputArgs,
    parameters: &[String],
    json: bool,
) -> anyhow::Result<()> {
    let (start, end) = input.window()?;
    let table = ThresholdTable::sans_241();

    let ingestion = input.ingest().await?;
    let report =
        Report::build_windowed(&ingestion.dataset, start, end, table).select(parameters, table);
    info!(
        "summarize: {} readings in window from {}",
        report.readings.len(),
        ingestion.origin
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&ingestion, &report));
    }
    Ok(())
}

/// Render a report as a plain-text table. Values are shown to 3 decimals.
pub fn format_report(ingestion: &Ingestion, report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Source: {}{} ({} rows read, {} rejected)",
        ingestion.origin,
        if ingestion.used_fallback { " [fallback]" } else { "" },
        ingestion.rows_read,
        ingestion.rows_rejected()
    );
    match report.readings.time_span() {
        Some((first, last)) => {
            let _ = writeln!(
                out,
                "Readings: {} from {} to {}",
                report.readings.len(),
                format_timestamp(&first),
                format_timestamp(&last)
            );
        }
        None => {
            let _ = writeln!(out, "Readings: none in the selected window");
        }
    }
    let _ = writeln!(
        out,
        "{:<24} {:>10} {:>10} {:>10}  {:<9} {:<8} {:>6}",
        "Parameter", "Min", "Max", "Mean", "Good", "Status", "Exceed"
    );
    for r in &report.parameters {
        let name = match (r.label, r.unit) {
            (Some(label), Some(unit)) => format!("{label} ({unit})"),
            _ => r.parameter.clone(),
        };
        match r.summary {
            Some(summary) => {
                let _ = writeln!(
                    out,
                    "{:<24} {:>10.3} {:>10.3} {:>10.3}  {:<9} {:<8} {:>6}",
                    name,
                    summary.min,
                    summary.max,
                    summary.mean,
                    r.range_text.unwrap_or("-"),
                    r.verdict,
                    r.exceedances
                );
            }
            None => {
                let _ = writeln!(
                    out,
                    "{:<24} {:>10} {:>10} {:>10}  {:<9} {}",
                    name, "-", "-", "-", "-", r.verdict
                );
            }
        }
    }
    out
}

/// Render the threshold table.
pub fn format_thresholds(table: &ThresholdTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<20} {:<24} {:<10} Good range", "Parameter", "Label", "Unit");
    for t in table.iter() {
        let _ = writeln!(
            out,
            "{:<20} {:<24} {:<10} {}",
            t.parameter.id(),
            t.label,
            t.unit,
            t.range_text
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wq_core::{ingest::ingest, reading::NumericPolicy, source::StaticSampleSource};

    #[tokio::test]
    async fn test_format_report_for_sample() {
        let ingestion = ingest(&StaticSampleSource, NumericPolicy::Lenient)
            .await
            .unwrap();
        let report = Report::build(&ingestion.dataset, ThresholdTable::sans_241())
            .select(&["pH", "ammonia_mg_L"], ThresholdTable::sans_241());
        let text = format_report(&ingestion, &report);
        assert!(text.starts_with("Source: bundled sample (5 rows read, 0 rejected)"));
        assert!(text.contains("Readings: 5 from 2023-01-01 00:00:00 to 2023-01-01 04:00:00"));
        let ph_line = text.lines().find(|l| l.starts_with("pH (")).unwrap();
        assert!(ph_line.contains("7.100"));
        assert!(ph_line.contains("7.500"));
        assert!(ph_line.contains("7.300"));
        assert!(ph_line.contains("Good"));
        assert!(text.lines().any(|l| l.starts_with("ammonia_mg_L") && l.ends_with("Unknown")));
    }

    #[test]
    fn test_format_thresholds() {
        let text = format_thresholds(ThresholdTable::sans_241());
        assert_eq!(text.lines().count(), 6);
        assert!(text.lines().any(|l| l.starts_with("tds_mg_L") && l.ends_with("≤1200")));
    }
}
