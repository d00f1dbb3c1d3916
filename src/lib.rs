//! captiond - caption generation and subtitle burn-in service.
//!
//! Fetches a remote video, obtains timed subtitles from an external
//! transcription service, and can burn a subtitle track onto a video with
//! a caller-controlled style via an external render tool.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod fetch;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod stt;
pub mod subtitle;
pub mod workspace;

// Core collaborator seams (fetch → transcribe/segment → render)
pub use fetch::Fetcher;
pub use render::{FfmpegRenderer, MockRenderer, SubtitleRenderer};
pub use stt::transcriber::{MockTranscriber, OutputMode, Transcriber, TranscriptOutput};

// Pipeline
pub use pipeline::{BurnRequest, CaptionPipeline, GenerateRequest, PipelineOutput};

// Subtitle model
pub use subtitle::cue::{SubtitleCue, TranscriptSegment, segment_cues};
pub use subtitle::style::StyleSpec;

// Error handling
pub use error::{CaptionError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
