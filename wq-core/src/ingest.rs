//! One ingestion pass: fetch, parse, build.
//!
//! The pass runs to completion once the raw text is in hand. A fallback
//! source is only consulted when the caller supplies one and the preferred
//! source could not be reached; an empty dataset never triggers a fallback.

use crate::{
    dataset::Dataset,
    error::{IngestError, Result},
    reading::{NumericPolicy, RawRecord},
    source::RecordSource,
};
use log::{info, warn};

/// The outcome of a successful ingestion pass.
#[derive(Debug, Clone)]
pub struct Ingestion {
    /// Name of the source that supplied the records.
    pub origin: String,
    /// Whether the fallback source was used.
    pub used_fallback: bool,
    /// Number of raw records read from the source.
    pub rows_read: usize,
    pub dataset: Dataset,
}

impl Ingestion {
    pub fn rows_rejected(&self) -> usize {
        self.rows_read - self.dataset.len()
    }
}

/// Ingest from a single source.
pub async fn ingest<S: RecordSource>(source: &S, policy: NumericPolicy) -> Result<Ingestion> {
    let records = source.fetch_records().await?;
    finish(source.name(), false, &records, policy)
}

/// Ingest from `preferred`, trying `fallback` only if `preferred` is unavailable.
pub async fn ingest_with_fallback<P: RecordSource, F: RecordSource>(
    preferred: &P,
    fallback: &F,
    policy: NumericPolicy,
) -> Result<Ingestion> {
    match preferred.fetch_records().await {
        Ok(records) => finish(preferred.name(), false, &records, policy),
        Err(IngestError::SourceUnavailable { origin, reason }) => {
            warn!(
                "ingest: {} unavailable ({}), falling back to {}",
                origin,
                reason,
                fallback.name()
            );
            let records = fallback.fetch_records().await?;
            finish(fallback.name(), true, &records, policy)
        }
        Err(e) => Err(e),
    }
}

fn finish(
    origin: String,
    used_fallback: bool,
    records: &[RawRecord],
    policy: NumericPolicy,
) -> Result<Ingestion> {
    let dataset = Dataset::build(records, policy);
    if dataset.is_empty() {
        warn!("ingest: no valid readings among {} rows from {}", records.len(), origin);
        return Err(IngestError::EmptyDataset { origin });
    }
    info!(
        "ingest: {} readings from {} ({} rows rejected)",
        dataset.len(),
        origin,
        records.len() - dataset.len()
    );
    Ok(Ingestion {
        origin,
        used_fallback,
        rows_read: records.len(),
        dataset,
    })
}
