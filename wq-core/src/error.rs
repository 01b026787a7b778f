//! Error types for water quality ingestion
use thiserror::Error;

/// Terminal ingestion failures surfaced to the caller.
///
/// Individual row rejections are not errors; see [`crate::reading::RowRejection`].
#[derive(Error, Debug)]
pub enum IngestError {
    /// The raw bytes could not be retrieved at all
    #[error("Source '{origin}' unavailable: {reason}")]
    SourceUnavailable { origin: String, reason: String },

    /// Data was retrieved but no row survived validation
    #[error("No valid readings in data from '{origin}'")]
    EmptyDataset { origin: String },

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),
}

impl IngestError {
    pub fn unavailable(origin: impl Into<String>, reason: impl ToString) -> IngestError {
        IngestError::SourceUnavailable {
            origin: origin.into(),
            reason: reason.to_string(),
        }
    }
}

/// Type alias for Results using IngestError
pub type Result<T> = std::result::Result<T, IngestError>;
