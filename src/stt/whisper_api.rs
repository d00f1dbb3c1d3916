//! Transcription backend for OpenAI-compatible audio endpoints.
//!
//! Submits the media file as a streamed multipart upload and asks the
//! service for either pre-formatted subtitle text (`srt`) or a timed
//! segment list (`verbose_json`), matching [`OutputMode`].

use crate::config::TranscriptionConfig;
use crate::error::{CaptionError, Result};
use crate::stt::transcriber::{OutputMode, Transcriber, TranscriptOutput};
use crate::subtitle::cue::TranscriptSegment;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tokio_util::codec::{BytesCodec, FramedRead};

/// Structured (`verbose_json`) response body. Only the segment list is
/// consumed; the service's other metadata is ignored.
#[derive(Debug, Deserialize)]
struct VerboseTranscription {
    segments: Vec<TranscriptSegment>,
}

/// Client for an OpenAI-compatible transcription endpoint.
pub struct WhisperApiTranscriber {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl WhisperApiTranscriber {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                CaptionError::Other(format!("Failed to build transcription client: {e}"))
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout,
        })
    }

    pub fn from_config(config: &TranscriptionConfig) -> Result<Self> {
        Self::new(
            &config.endpoint,
            &config.api_key,
            &config.model,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn response_format(mode: OutputMode) -> &'static str {
        match mode {
            OutputMode::RawSubtitle => "srt",
            OutputMode::Structured => "verbose_json",
        }
    }

    async fn media_part(&self, media: &Path) -> Result<Part> {
        let file = tokio::fs::File::open(media).await?;
        let file_name = media
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("media.mp4")
            .to_string();
        Part::stream(reqwest::Body::wrap_stream(FramedRead::new(
            file,
            BytesCodec::new(),
        )))
        .file_name(file_name)
        .mime_str("application/octet-stream")
        .map_err(|e| CaptionError::TranscriptionRequest {
            message: format!("failed to build upload part: {e}"),
        })
    }

    fn request_error(&self, error: reqwest::Error) -> CaptionError {
        if error.is_timeout() {
            CaptionError::StageTimeout {
                stage: "transcription",
                seconds: self.timeout.as_secs(),
            }
        } else {
            CaptionError::TranscriptionRequest {
                message: error.to_string(),
            }
        }
    }
}

#[async_trait]
impl Transcriber for WhisperApiTranscriber {
    async fn transcribe(&self, media: &Path, mode: OutputMode) -> Result<TranscriptOutput> {
        let form = Form::new()
            .part("file", self.media_part(media).await?)
            .text("model", self.model.clone())
            .text("response_format", Self::response_format(mode));

        tracing::debug!(
            endpoint = %self.endpoint,
            model = %self.model,
            format = Self::response_format(mode),
            media = %media.display(),
            "submitting transcription request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.request_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.request_error(e))?;

        if !status.is_success() {
            return Err(CaptionError::Transcription {
                status: status.as_u16(),
                message: body.trim().to_string(),
            });
        }

        match mode {
            OutputMode::RawSubtitle => Ok(TranscriptOutput::RawSubtitle(body)),
            OutputMode::Structured => {
                let verbose: VerboseTranscription =
                    serde_json::from_str(&body).map_err(|e| CaptionError::Serialization {
                        message: format!("invalid transcription response: {e}"),
                    })?;
                Ok(TranscriptOutput::Segments(verbose.segments))
            }
        }
    }
}
