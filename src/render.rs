//! Subtitle burn-in via an external render tool.
//!
//! The burn filter embeds caller-influenced values (subtitle path, fonts
//! directory, style string) inside filtergraph syntax, so every component
//! is single-quoted and quote-escaped, and the tool is always invoked with
//! an argument vector, never a shell string.

use crate::config::RenderConfig;
use crate::error::{CaptionError, Result};
use crate::subtitle::style::StyleSpec;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

/// Trait for burning a subtitle track onto a video.
///
/// This trait allows swapping implementations (real render tool vs mock).
#[async_trait]
pub trait SubtitleRenderer: Send + Sync {
    /// Burn `subtitle` onto `video` with `style`, writing `output`.
    ///
    /// `fonts_dir` is made visible to the burn filter so fetched fonts can
    /// be resolved by family name.
    async fn render(
        &self,
        video: &Path,
        subtitle: &Path,
        fonts_dir: &Path,
        style: &StyleSpec,
        output: &Path,
    ) -> Result<()>;
}

/// Escape a value for embedding inside a single-quoted filtergraph
/// component. Within quotes only the quote itself is special; it is
/// spliced in as `'\''`.
fn escape_filter_component(value: &str) -> String {
    value.replace('\'', r"'\''")
}

/// Build the subtitle-burn filter expression.
pub fn build_burn_filter(subtitle: &Path, fonts_dir: &Path, style: &StyleSpec) -> String {
    format!(
        "subtitles='{}':fontsdir='{}':force_style='{}'",
        escape_filter_component(&subtitle.to_string_lossy()),
        escape_filter_component(&fonts_dir.to_string_lossy()),
        escape_filter_component(style.as_force_style()),
    )
}

/// Renderer that shells out to ffmpeg (or a compatible tool).
pub struct FfmpegRenderer {
    program: String,
    timeout: Duration,
}

impl FfmpegRenderer {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(&config.program, Duration::from_secs(config.timeout_secs))
    }
}

#[async_trait]
impl SubtitleRenderer for FfmpegRenderer {
    async fn render(
        &self,
        video: &Path,
        subtitle: &Path,
        fonts_dir: &Path,
        style: &StyleSpec,
        output: &Path,
    ) -> Result<()> {
        let filter = build_burn_filter(subtitle, fonts_dir, style);

        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.arg("-y")
            .arg("-i")
            .arg(video)
            .arg("-vf")
            .arg(&filter)
            .arg("-c:a")
            .arg("copy")
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!(program = %self.program, filter = %filter, "running render tool");

        let child = cmd.spawn().map_err(|e| CaptionError::RenderSpawn {
            message: format!("{}: {e}", self.program),
        })?;

        // Dropping the future on timeout kills the child via kill_on_drop
        let waited = tokio::time::timeout(self.timeout, child.wait_with_output()).await;
        let tool_output = match waited {
            Err(_) => {
                return Err(CaptionError::StageTimeout {
                    stage: "render",
                    seconds: self.timeout.as_secs(),
                });
            }
            Ok(result) => result?,
        };

        if !tool_output.status.success() {
            return Err(CaptionError::Render {
                status: tool_output.status.code(),
                stderr: String::from_utf8_lossy(&tool_output.stderr)
                    .trim()
                    .to_string(),
            });
        }

        Ok(())
    }
}

/// Mock renderer for testing.
///
/// Records the style of every invocation and writes placeholder output
/// bytes, or fails when configured to.
#[derive(Debug)]
pub struct MockRenderer {
    should_fail: bool,
    output_bytes: Vec<u8>,
    styles: std::sync::Mutex<Vec<String>>,
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRenderer {
    pub fn new() -> Self {
        Self {
            should_fail: false,
            output_bytes: b"mock rendered video".to_vec(),
            styles: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Configure the bytes written to the output path.
    pub fn with_output_bytes(mut self, bytes: &[u8]) -> Self {
        self.output_bytes = bytes.to_vec();
        self
    }

    /// Configure the mock to fail on render.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Styles seen so far, in invocation order.
    pub fn styles(&self) -> Vec<String> {
        self.styles.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SubtitleRenderer for MockRenderer {
    async fn render(
        &self,
        _video: &Path,
        _subtitle: &Path,
        _fonts_dir: &Path,
        style: &StyleSpec,
        output: &Path,
    ) -> Result<()> {
        if let Ok(mut styles) = self.styles.lock() {
            styles.push(style.as_force_style().to_string());
        }
        if self.should_fail {
            return Err(CaptionError::Render {
                status: Some(1),
                stderr: "mock render failure".to_string(),
            });
        }
        tokio::fs::write(output, &self.output_bytes).await?;
        Ok(())
    }
}
