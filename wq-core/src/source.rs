//! Raw record providers.
//!
//! Every source hands back CSV text through [`RecordSource`]; the pipeline
//! never knows which one supplied it.

use crate::{
    dataset::parse_raw_records,
    error::{IngestError, Result},
    reading::RawRecord,
};
use std::path::PathBuf;

#[cfg(feature = "api")]
use log::{info, warn};
#[cfg(feature = "api")]
use reqwest::{Client, StatusCode};
#[cfg(feature = "api")]
use std::time::Duration;

/// Embedded five-row sample used when no external data is available.
pub static SAMPLE_CSV: &str = include_str!("../../fixtures/sample.csv");

/// A provider of raw tabular records.
#[allow(async_fn_in_trait)]
pub trait RecordSource {
    /// Short description used in logs and error messages.
    fn name(&self) -> String;

    /// Retrieve the raw CSV text.
    async fn fetch_text(&self) -> Result<String>;

    /// Retrieve and split into header-keyed records.
    async fn fetch_records(&self) -> Result<Vec<RawRecord>> {
        let text = self.fetch_text().await?;
        parse_raw_records(&text)
    }
}

/// The bundled sample.
#[derive(Debug, Default, Clone, Copy)]
pub struct StaticSampleSource;

impl RecordSource for StaticSampleSource {
    fn name(&self) -> String {
        "bundled sample".to_string()
    }

    async fn fetch_text(&self) -> Result<String> {
        Ok(SAMPLE_CSV.to_string())
    }
}

/// A CSV file on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    pub path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalFileSource { path: path.into() }
    }
}

impl RecordSource for LocalFileSource {
    fn name(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch_text(&self) -> Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| IngestError::unavailable(self.name(), e))
    }
}

/// A CSV file fetched over HTTP(S), with bounded retry and exponential backoff.
#[cfg(feature = "api")]
#[derive(Debug, Clone)]
pub struct RemoteFileSource {
    pub url: String,
    pub timeout: Duration,
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

#[cfg(feature = "api")]
impl RemoteFileSource {
    pub fn new(url: impl Into<String>) -> Self {
        RemoteFileSource {
            url: url.into(),
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1000),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }
}

#[cfg(feature = "api")]
impl RecordSource for RemoteFileSource {
    fn name(&self) -> String {
        self.url.clone()
    }

    async fn fetch_text(&self) -> Result<String> {
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| IngestError::unavailable(self.name(), e))?;
        let max_tries = self.max_attempts.max(1);
        let mut backoff = self.initial_backoff;
        let mut last_failure = String::from("no attempt made");

        for attempt in 1..=max_tries {
            match client.get(&self.url).send().await {
                Ok(response) if response.status() != StatusCode::OK => {
                    last_failure = format!("bad response status {}", response.status());
                }
                Ok(response) => match response.text().await {
                    Ok(body) => return Ok(body),
                    Err(e) => last_failure = format!("failed to read response body: {e}"),
                },
                Err(e) => last_failure = format!("request failed: {e}"),
            }
            warn!(
                "source: attempt {}/{} for {}: {}",
                attempt, max_tries, self.url, last_failure
            );

            if attempt < max_tries {
                info!(
                    "source: sleeping for {} milliseconds before retrying {}",
                    backoff.as_millis(),
                    self.url
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }
        }

        Err(IngestError::unavailable(self.name(), last_failure))
    }
}


#[cfg(all(test, feature = "api"))]
mod remote_tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    const BODY: &str = "timestamp,pH,turbidity_NTU,free_chlorine_mg_L,tds_mg_L,nitrate_mg_L\n2023-01-01,7.0,1.0,0.5,300,4.0\n";

    /// Answer one request per connection with the given statuses, in order.
    /// The handle resolves to the number of requests served.
    async fn serve(statuses: Vec<u16>) -> (String, JoinHandle<usize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let mut served = 0;
            for status in statuses {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = [0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let body = if status == 200 { BODY } else { "server error" };
                let reply = format!(
                    "HTTP/1.1 {status} Status\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(reply.as_bytes()).await.unwrap();
                let _ = socket.shutdown().await;
                served += 1;
            }
            served
        });
        (format!("http://{addr}/readings.csv"), handle)
    }

    fn remote(url: &str, max_attempts: u32) -> RemoteFileSource {
        RemoteFileSource::new(url)
            .with_timeout(Duration::from_secs(5))
            .with_max_attempts(max_attempts)
            .with_initial_backoff(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_remote_success() {
        let (url, server) = serve(vec![200]).await;
        let records = remote(&url, 3).fetch_records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["tds_mg_L"], "300");
        assert_eq!(server.await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_remote_retries_after_server_error() {
        let (url, server) = serve(vec![500, 200]).await;
        let text = remote(&url, 3).fetch_text().await.unwrap();
        assert_eq!(text, BODY);
        assert_eq!(server.await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_remote_exhausted_attempts_unavailable() {
        let (url, server) = serve(vec![500, 503, 500]).await;
        let err = remote(&url, 3).fetch_text().await.unwrap_err();
        match err {
            IngestError::SourceUnavailable { origin, reason } => {
                assert_eq!(origin, url);
                assert!(reason.contains("500"), "{reason}");
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(server.await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_remote_timeout_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/slow.csv", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            drop(socket);
        });
        let source = RemoteFileSource::new(&url)
            .with_timeout(Duration::from_millis(100))
            .with_max_attempts(1);
        let err = source.fetch_text().await.unwrap_err();
        assert!(matches!(err, IngestError::SourceUnavailable { .. }));
        server.abort();
    }

    #[tokio::test]
    async fn test_connection_refused_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/gone.csv", listener.local_addr().unwrap());
        drop(listener);
        let err = remote(&url, 2).fetch_text().await.unwrap_err();
        assert!(matches!(err, IngestError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_builder_defaults() {
        let source = RemoteFileSource::new("http://localhost/data.csv");
        assert_eq!(source.timeout, Duration::from_secs(30));
        assert_eq!(source.max_attempts, 3);
        assert_eq!(source.initial_backoff, Duration::from_secs(1));
        assert_eq!(source.with_max_attempts(0).max_attempts, 1);
    }
}
