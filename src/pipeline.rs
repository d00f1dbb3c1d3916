//! Pipeline orchestration: fetch → transcribe/segment or render → respond.
//!
//! Each request runs through one [`CaptionPipeline`] call that owns a fresh
//! [`Workspace`]. Failure at any stage drops the workspace immediately,
//! deleting every partial file; on success the workspace travels inside the
//! returned [`PipelineOutput`] and is released only once the caller has
//! finished streaming the produced file.

use crate::config::Config;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::render::{FfmpegRenderer, SubtitleRenderer};
use crate::stt::transcriber::{OutputMode, Transcriber, TranscriptOutput};
use crate::stt::whisper_api::WhisperApiTranscriber;
use crate::subtitle::cue::segment_cues;
use crate::subtitle::srt;
use crate::subtitle::style::StyleSpec;
use crate::workspace::Workspace;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Generate-subtitles request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    pub video_url: String,
    /// Transcription output mode; defaults to local segmentation.
    #[serde(default)]
    pub mode: OutputMode,
}

/// Burn-subtitles request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct BurnRequest {
    pub video_url: String,
    pub srt_url: String,
    pub font_url: String,
    /// Optional pre-formatted `force_style` override.
    #[serde(default)]
    pub style: Option<String>,
}

/// A produced file together with the workspace that owns it.
///
/// The file stays on disk for as long as this value is alive; dropping it
/// deletes the whole temporary resource set.
#[derive(Debug)]
pub struct PipelineOutput {
    path: PathBuf,
    workspace: Workspace,
}

impl PipelineOutput {
    fn new(path: PathBuf, workspace: Workspace) -> Self {
        Self { path, workspace }
    }

    /// Path of the produced file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Correlation id of the owning request.
    pub fn id(&self) -> &str {
        self.workspace.id()
    }
}

/// The per-request caption pipeline.
pub struct CaptionPipeline {
    fetcher: Fetcher,
    transcriber: Arc<dyn Transcriber>,
    renderer: Arc<dyn SubtitleRenderer>,
    workdir: PathBuf,
}

impl CaptionPipeline {
    /// Build the pipeline with its production collaborators from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(Duration::from_secs(config.fetch.timeout_secs))?,
            transcriber: Arc::new(WhisperApiTranscriber::from_config(&config.transcription)?),
            renderer: Arc::new(FfmpegRenderer::from_config(&config.render)),
            workdir: config.storage.workdir.clone(),
        })
    }

    /// Replace the transcription backend (for tests or alternate services).
    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = transcriber;
        self
    }

    /// Replace the render backend (for tests or alternate tools).
    pub fn with_renderer(mut self, renderer: Arc<dyn SubtitleRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Run the generate-subtitles flow: fetch the video, transcribe it, and
    /// produce a subtitle file.
    pub async fn generate_subtitles(&self, request: &GenerateRequest) -> Result<PipelineOutput> {
        let workspace = Workspace::create(&self.workdir)?;
        tracing::info!(
            id = workspace.id(),
            url = %request.video_url,
            mode = ?request.mode,
            "generating subtitles"
        );

        // On error the workspace drops here and removes every partial file
        let path = self.run_generate(&workspace, request).await?;
        Ok(PipelineOutput::new(path, workspace))
    }

    async fn run_generate(
        &self,
        workspace: &Workspace,
        request: &GenerateRequest,
    ) -> Result<PathBuf> {
        let video = workspace.video_path();
        self.fetcher.fetch(&request.video_url, &video).await?;

        let transcript = self.transcriber.transcribe(&video, request.mode).await?;
        let srt_text = match transcript {
            TranscriptOutput::RawSubtitle(text) => text,
            TranscriptOutput::Segments(segments) => srt::to_srt(&segment_cues(&segments)),
        };

        let subtitle = workspace.subtitle_path();
        tokio::fs::write(&subtitle, srt_text).await?;
        Ok(subtitle)
    }

    /// Run the burn-subtitles flow: fetch video, subtitle and font
    /// concurrently, then burn the subtitle track onto the video.
    pub async fn burn_subtitles(&self, request: &BurnRequest) -> Result<PipelineOutput> {
        let workspace = Workspace::create(&self.workdir)?;
        tracing::info!(
            id = workspace.id(),
            video = %request.video_url,
            subtitle = %request.srt_url,
            font = %request.font_url,
            "burning subtitles"
        );

        let path = self.run_burn(&workspace, request).await?;
        Ok(PipelineOutput::new(path, workspace))
    }

    async fn run_burn(&self, workspace: &Workspace, request: &BurnRequest) -> Result<PathBuf> {
        let video = workspace.video_path();
        let subtitle = workspace.subtitle_path();
        let font = workspace.font_path();

        // Fail-fast: the first fetch error cancels the outstanding
        // transfers; already-written files are removed with the workspace.
        tokio::try_join!(
            self.fetcher.fetch(&request.video_url, &video),
            self.fetcher.fetch(&request.srt_url, &subtitle),
            self.fetcher.fetch(&request.font_url, &font),
        )?;

        let style = match &request.style {
            Some(custom) => StyleSpec::custom(custom),
            None => StyleSpec::with_font(&workspace.font_name()),
        };

        let output = workspace.output_path();
        self.renderer
            .render(&video, &subtitle, workspace.dir(), &style, &output)
            .await?;
        Ok(output)
    }
}
