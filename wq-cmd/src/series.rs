//! The `series` command: one parameter's readings for a line chart.

use crate::source::InputArgs;
use anyhow::anyhow;
use log::info;
use std::io;
use wq_core::parameter::{Parameter, TIMESTAMP_COLUMN};
use wq_data::series::{series, TimeValue};
use wq_utils::dates::format_timestamp;

/// Ingest, cut the requested window and print the series for `parameter_id`.
pub async fn run_series(input: &InputArgs, parameter_id: &str, json: bool) -> anyhow::Result<()> {
    let parameter = Parameter::from_id(parameter_id)
        .ok_or_else(|| anyhow!("unknown parameter '{parameter_id}'"))?;
    let (start, end) = input.window()?;

    let ingestion = input.ingest().await?;
    let points = series(&ingestion.dataset.window(start, end), parameter);
    info!(
        "series: {} points of {} from {}",
        points.len(),
        parameter,
        ingestion.origin
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&points)?);
    } else {
        write_series_csv(parameter, &points, io::stdout().lock())?;
    }
    Ok(())
}

/// Write points as two-column CSV headed by the timestamp and parameter id.
pub fn write_series_csv<W: io::Write>(
    parameter: Parameter,
    points: &[TimeValue],
    writer: W,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([TIMESTAMP_COLUMN, parameter.id()])?;
    for point in points {
        wtr.write_record([format_timestamp(&point.timestamp), point.value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
