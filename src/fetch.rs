//! Streaming resource fetcher.
//!
//! Downloads remote resources (video, subtitle, font files) to scoped local
//! paths. Response bodies are streamed chunk-by-chunk to disk so a large
//! video never has to be resident in memory at once.

use crate::error::{CaptionError, Result};
use futures_util::StreamExt;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// HTTP fetcher with a per-request deadline.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl Fetcher {
    /// Create a fetcher whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CaptionError::Other(format!("Failed to build fetch client: {e}")))?;
        Ok(Self { client, timeout })
    }

    /// Download `url` to `dest`.
    ///
    /// Fails on network errors, non-2xx responses, and write failures. A
    /// partially written destination file is left for the owning workspace
    /// to remove; this function does not clean up on its own.
    pub async fn fetch(&self, url: &str, dest: &Path) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.request_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CaptionError::FetchStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| self.request_error(url, e))?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::debug!(url, bytes = written, dest = %dest.display(), "fetched resource");
        Ok(())
    }

    fn request_error(&self, url: &str, error: reqwest::Error) -> CaptionError {
        if error.is_timeout() {
            CaptionError::StageTimeout {
                stage: "fetch",
                seconds: self.timeout.as_secs(),
            }
        } else {
            CaptionError::Fetch {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}
