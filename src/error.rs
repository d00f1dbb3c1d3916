//! Error types for captiond.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptionError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    // Resource fetch errors
    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Fetch of {url} returned status {status}")]
    FetchStatus { url: String, status: u16 },

    // Transcription service errors
    #[error("Transcription request failed: {message}")]
    TranscriptionRequest { message: String },

    #[error("Transcription service returned status {status}: {message}")]
    Transcription { status: u16, message: String },

    // Render errors
    #[error("Failed to launch render tool: {message}")]
    RenderSpawn { message: String },

    #[error("Render tool exited with status {status:?}: {stderr}")]
    Render { status: Option<i32>, stderr: String },

    // Subtitle data errors
    #[error("Malformed subtitle data: {message}")]
    Serialization { message: String },

    // Stage deadline exceeded
    #[error("{stage} stage timed out after {seconds}s")]
    StageTimeout { stage: &'static str, seconds: u64 },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, CaptionError>;
