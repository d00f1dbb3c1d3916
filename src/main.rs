use anyhow::Result;
use captiond::cli::Cli;
use captiond::config::Config;
use captiond::pipeline::CaptionPipeline;
use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .init();

    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    }
    .with_env_overrides();

    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    if let Some(workdir) = cli.workdir {
        config.storage.workdir = workdir;
    }
    config.validate()?;

    if config.transcription.api_key.is_empty() {
        tracing::warn!(
            "no transcription API key configured; generate-subtitles requests will be rejected upstream"
        );
    }

    tracing::info!(
        version = %captiond::version_string(),
        workdir = %config.storage.workdir.display(),
        "starting captiond"
    );

    let pipeline = Arc::new(CaptionPipeline::from_config(&config)?);
    captiond::server::serve(pipeline, &config.server.listen).await
}
