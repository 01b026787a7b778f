//! Runtime selection between the sample, a local file and a remote file.

use chrono::NaiveDateTime;
use clap::{builder::BoolishValueParser, Args};
use std::time::Duration;
use wq_core::{
    error::Result,
    ingest::{ingest, ingest_with_fallback, Ingestion},
    reading::NumericPolicy,
    source::{LocalFileSource, RecordSource, RemoteFileSource, StaticSampleSource},
};
use wq_utils::dates::parse_timestamp;

/// Input flags shared by every command that reads sensor data.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Local CSV file to read (defaults to the bundled sample)
    #[arg(short = 'f', long, env = "WQ_SOURCE_FILE", conflicts_with = "url")]
    pub file: Option<String>,

    /// Remote CSV file to fetch
    #[arg(short = 'u', long, env = "WQ_SOURCE_URL")]
    pub url: Option<String>,

    /// Use the bundled sample if the file or URL cannot be read
    #[arg(long, env = "WQ_FALLBACK_TO_SAMPLE", value_parser = BoolishValueParser::new())]
    pub fallback_to_sample: bool,

    /// Reject rows with non-numeric values instead of reading them as zero
    #[arg(long, env = "WQ_STRICT", value_parser = BoolishValueParser::new())]
    pub strict: bool,

    /// Only include readings at or after this timestamp
    #[arg(long)]
    pub start: Option<String>,

    /// Only include readings at or before this timestamp
    #[arg(long)]
    pub end: Option<String>,

    /// HTTP timeout in seconds for remote sources
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Attempts before a remote source is reported unavailable
    #[arg(long, default_value_t = 3)]
    pub max_attempts: u32,
}

impl InputArgs {
    pub fn policy(&self) -> NumericPolicy {
        if self.strict {
            NumericPolicy::Strict
        } else {
            NumericPolicy::Lenient
        }
    }

    pub fn source_options(&self) -> SourceOptions {
        SourceOptions {
            file: self.file.clone(),
            url: self.url.clone(),
            fallback_to_sample: self.fallback_to_sample,
            timeout_secs: self.timeout_secs,
            max_attempts: self.max_attempts,
        }
    }

    /// Parse the optional `--start` / `--end` bounds.
    pub fn window(&self) -> anyhow::Result<(Option<NaiveDateTime>, Option<NaiveDateTime>)> {
        let start = self.start.as_deref().map(parse_timestamp).transpose()?;
        let end = self.end.as_deref().map(parse_timestamp).transpose()?;
        Ok((start, end))
    }

    /// Ingest from the configured source.
    pub async fn ingest(&self) -> Result<Ingestion> {
        ingest_selected(&self.source_options(), self.policy()).await
    }
}

/// Where to read records from.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    pub file: Option<String>,
    pub url: Option<String>,
    pub fallback_to_sample: bool,
    pub timeout_secs: u64,
    pub max_attempts: u32,
}

/// The source chosen from [`SourceOptions`].
#[derive(Debug, Clone)]
pub enum SelectedSource {
    Sample(StaticSampleSource),
    File(LocalFileSource),
    Remote(RemoteFileSource),
}

impl SelectedSource {
    /// A file takes precedence over a URL; with neither, the bundled sample is used.
    pub fn from_options(options: &SourceOptions) -> SelectedSource {
        match (&options.file, &options.url) {
            (Some(path), _) => SelectedSource::File(LocalFileSource::new(path)),
            (None, Some(url)) => SelectedSource::Remote(
                RemoteFileSource::new(url)
                    .with_timeout(Duration::from_secs(options.timeout_secs))
                    .with_max_attempts(options.max_attempts),
            ),
            (None, None) => SelectedSource::Sample(StaticSampleSource),
        }
    }

    pub fn is_sample(&self) -> bool {
        matches!(self, SelectedSource::Sample(_))
    }
}

impl RecordSource for SelectedSource {
    fn name(&self) -> String {
        match self {
            SelectedSource::Sample(s) => s.name(),
            SelectedSource::File(s) => s.name(),
            SelectedSource::Remote(s) => s.name(),
        }
    }

    async fn fetch_text(&self) -> Result<String> {
        match self {
            SelectedSource::Sample(s) => s.fetch_text().await,
            SelectedSource::File(s) => s.fetch_text().await,
            SelectedSource::Remote(s) => s.fetch_text().await,
        }
    }
}

/// Run one ingestion pass for the configured source.
///
/// The sample is only used as a fallback when explicitly requested.
pub async fn ingest_selected(options: &SourceOptions, policy: NumericPolicy) -> Result<Ingestion> {
    let source = SelectedSource::from_options(options);
    if options.fallback_to_sample && !source.is_sample() {
        ingest_with_fallback(&source, &StaticSampleSource, policy).await
    } else {
        ingest(&source, policy).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wq_core::error::IngestError;

    #[test]
    fn test_selection_precedence() {
        let mut options = SourceOptions::default();
        assert!(SelectedSource::from_options(&options).is_sample());

        options.url = Some("https://example.invalid/data.csv".to_string());
        assert!(matches!(
            SelectedSource::from_options(&options),
            SelectedSource::Remote(_)
        ));

        options.file = Some("readings.csv".to_string());
        assert!(matches!(
            SelectedSource::from_options(&options),
            SelectedSource::File(_)
        ));
    }

    #[test]
    fn test_remote_settings_applied() {
        let options = SourceOptions {
            url: Some("https://example.invalid/data.csv".to_string()),
            timeout_secs: 5,
            max_attempts: 0,
            ..Default::default()
        };
        match SelectedSource::from_options(&options) {
            SelectedSource::Remote(remote) => {
                assert_eq!(remote.timeout, Duration::from_secs(5));
                assert_eq!(remote.max_attempts, 1);
            }
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn test_input_args() {
        let mut args = InputArgs {
            url: Some("https://example.invalid/data.csv".to_string()),
            timeout_secs: 10,
            max_attempts: 2,
            start: Some("2023-01-01 01:00".to_string()),
            ..Default::default()
        };
        assert_eq!(args.policy(), NumericPolicy::Lenient);
        args.strict = true;
        assert_eq!(args.policy(), NumericPolicy::Strict);

        let options = args.source_options();
        assert_eq!(options.url, args.url);
        assert_eq!(options.timeout_secs, 10);
        assert_eq!(options.max_attempts, 2);

        let (start, end) = args.window().unwrap();
        assert_eq!(start.map(|s| s.to_string()), Some("2023-01-01 01:00:00".to_string()));
        assert_eq!(end, None);

        args.end = Some("sometime".to_string());
        assert!(args.window().is_err());
    }

    #[tokio::test]
    async fn test_missing_file_without_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let options = SourceOptions {
            file: Some(dir.path().join("absent.csv").display().to_string()),
            ..Default::default()
        };
        let err = ingest_selected(&options, NumericPolicy::Lenient)
            .await
            .unwrap_err();
        assert!(matches!(err, IngestError::SourceUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_missing_file_with_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let options = SourceOptions {
            file: Some(dir.path().join("absent.csv").display().to_string()),
            fallback_to_sample: true,
            ..Default::default()
        };
        let ingestion = ingest_selected(&options, NumericPolicy::Lenient)
            .await
            .unwrap();
        assert!(ingestion.used_fallback);
        assert_eq!(ingestion.dataset.len(), 5);
    }
}
