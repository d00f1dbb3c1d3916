//! Default values shared across configuration and CLI.

use std::path::PathBuf;

/// Default listen address for the HTTP surface.
pub const DEFAULT_LISTEN: &str = "0.0.0.0:3000";

/// Default transcription service endpoint (OpenAI-compatible audio API).
pub const DEFAULT_TRANSCRIPTION_ENDPOINT: &str = "https://api.openai.com/v1/audio/translations";

/// Default transcription model identifier.
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Default render tool binary.
pub const DEFAULT_RENDER_PROGRAM: &str = "ffmpeg";

/// Per-stage deadlines. Resource fetches are bounded tightly; transcription
/// and render scale with media length, so their budgets are generous.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TRANSCRIPTION_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 600;

/// Default work directory for per-request temporary files.
pub fn default_workdir() -> PathBuf {
    std::env::temp_dir().join("captiond")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_listen_parses_as_socket_addr() {
        let addr: std::net::SocketAddr = DEFAULT_LISTEN.parse().unwrap();
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_default_workdir_is_under_temp() {
        let dir = default_workdir();
        assert!(dir.to_string_lossy().contains("captiond"));
        assert!(dir.starts_with(std::env::temp_dir()));
    }
}
