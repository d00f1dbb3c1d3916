use crate::error::{CaptionError, Result};
use crate::subtitle::cue::TranscriptSegment;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Requested transcription output shape.
///
/// This is a caller-facing option on the generate flow: either the service
/// segments and formats the subtitles itself, or it returns timed segments
/// that are turned into cues locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Pre-formatted subtitle text straight from the service.
    RawSubtitle,
    /// Timed segment list, segmented into cues locally.
    #[default]
    Structured,
}

/// Result of a transcription call, shaped by the requested [`OutputMode`].
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptOutput {
    /// Subtitle text as produced by the service, opaque to this system.
    RawSubtitle(String),
    /// Timed segments for the cue segmenter.
    Segments(Vec<TranscriptSegment>),
}

/// Trait for speech-to-text transcription of a local media file.
///
/// This trait allows swapping implementations (real service client vs mock).
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the media file at `media` in the requested output mode.
    async fn transcribe(&self, media: &Path, mode: OutputMode) -> Result<TranscriptOutput>;
}

/// Mock transcriber for testing
#[derive(Debug, Clone)]
pub struct MockTranscriber {
    raw_subtitle: String,
    segments: Vec<TranscriptSegment>,
    should_fail: bool,
}

impl Default for MockTranscriber {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTranscriber {
    /// Create a new mock transcriber with empty responses.
    pub fn new() -> Self {
        Self {
            raw_subtitle: String::new(),
            segments: Vec::new(),
            should_fail: false,
        }
    }

    /// Configure the raw-subtitle response.
    pub fn with_raw_subtitle(mut self, text: &str) -> Self {
        self.raw_subtitle = text.to_string();
        self
    }

    /// Configure the structured segment response.
    pub fn with_segments(mut self, segments: Vec<TranscriptSegment>) -> Self {
        self.segments = segments;
        self
    }

    /// Configure the mock to fail on transcribe.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _media: &Path, mode: OutputMode) -> Result<TranscriptOutput> {
        if self.should_fail {
            return Err(CaptionError::Transcription {
                status: 500,
                message: "mock transcription failure".to_string(),
            });
        }
        match mode {
            OutputMode::RawSubtitle => Ok(TranscriptOutput::RawSubtitle(self.raw_subtitle.clone())),
            OutputMode::Structured => Ok(TranscriptOutput::Segments(self.segments.clone())),
        }
    }
}
