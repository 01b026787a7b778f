//! Turning CSV text into a validated [`Dataset`].
//!
//! Parsing happens in two steps: [`parse_raw_records`] splits the text into
//! header-keyed [`RawRecord`]s, then [`Dataset::build`] runs the row parser
//! over them and keeps whatever validates, in source order.

use crate::{
    error::Result,
    parameter::Parameter,
    reading::{NumericPolicy, RawRecord, Reading},
};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, Trim};
use log::debug;
use serde::Serialize;

/// Trim a cell and strip surrounding double quotes.
fn clean_cell(cell: &str) -> String {
    cell.trim().trim_matches('"').trim().to_string()
}

/// Split CSV text (header row required) into raw records keyed by header name.
///
/// Header names and cells are trimmed and unquoted. Rows shorter than the
/// header simply lack the trailing columns; extra columns are kept but
/// ignored downstream. A row the CSV reader cannot decode is skipped.
pub fn parse_raw_records(csv_text: &str) -> Result<Vec<RawRecord>> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(clean_cell).collect();

    let mut records = Vec::new();
    for (index, row) in rdr.records().enumerate() {
        match row {
            Ok(row) => records.push(
                headers
                    .iter()
                    .cloned()
                    .zip(row.iter().map(clean_cell))
                    .collect(),
            ),
            Err(e) => debug!("dataset: skipping undecodable row {}: {}", index + 1, e),
        }
    }
    Ok(records)
}

/// An ordered, immutable sequence of validated readings.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Dataset {
    readings: Vec<Reading>,
}

impl Dataset {
    /// Apply the row parser to every record, keeping valid readings in input order.
    ///
    /// This never fails; rejected rows are dropped and only logged at debug level.
    pub fn build(records: &[RawRecord], policy: NumericPolicy) -> Dataset {
        let mut rejected = 0usize;
        let readings = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| match Reading::from_record(record, policy) {
                Ok(reading) => Some(reading),
                Err(reason) => {
                    rejected += 1;
                    debug!("dataset: rejected row {}: {}", index + 1, reason);
                    None
                }
            })
            .collect::<Vec<Reading>>();
        debug!(
            "dataset: kept {} of {} rows ({} rejected)",
            readings.len(),
            records.len(),
            rejected
        );
        Dataset { readings }
    }

    /// Parse CSV text and build a dataset from it in one go.
    pub fn from_csv(csv_text: &str, policy: NumericPolicy) -> Result<Dataset> {
        let records = parse_raw_records(csv_text)?;
        Ok(Dataset::build(&records, policy))
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.readings.iter()
    }

    /// Values of one parameter, in dataset order.
    pub fn values(&self, parameter: Parameter) -> impl Iterator<Item = f64> + '_ {
        self.readings.iter().map(move |r| r.value(parameter))
    }

    /// Readings whose timestamp lies within `[start, end]`; either bound may be open.
    ///
    /// Order is preserved. No sorting is assumed, so every reading is checked.
    pub fn window(&self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Dataset {
        self.readings
            .iter()
            .filter(|r| {
                let ts = r.timestamp();
                start.map_or(true, |s| ts >= s) && end.map_or(true, |e| ts <= e)
            })
            .cloned()
            .collect()
    }

    /// Earliest and latest timestamps, or `None` when empty.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.readings.first()?.timestamp();
        Some(self.readings.iter().fold((first, first), |(lo, hi), r| {
            let ts = r.timestamp();
            (lo.min(ts), hi.max(ts))
        }))
    }
}

impl FromIterator<Reading> for Dataset {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Dataset {
            readings: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.readings.iter()
    }
}
