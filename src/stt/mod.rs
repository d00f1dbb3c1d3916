//! Speech-to-text: the transcription client seam and its backends.

pub mod transcriber;
pub mod whisper_api;

pub use transcriber::{MockTranscriber, OutputMode, Transcriber, TranscriptOutput};
pub use whisper_api::WhisperApiTranscriber;
