//! HTTP surface.
//!
//! A thin translation layer over [`CaptionPipeline`]: deserialize the JSON
//! request shape, run the flow, stream the produced file back. Stage errors
//! are logged with full detail and surfaced to the caller as a generic
//! server error, never the internal message.

use crate::error::Result;
use crate::pipeline::{BurnRequest, CaptionPipeline, GenerateRequest, PipelineOutput};
use axum::Json;
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use futures_util::StreamExt;
use serde_json::json;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

#[derive(Clone)]
struct AppState {
    pipeline: Arc<CaptionPipeline>,
}

/// Build the application router.
pub fn router(pipeline: Arc<CaptionPipeline>) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/generate-subtitles", post(generate_subtitles))
        .route("/burn-subtitles", post(burn_subtitles))
        .with_state(AppState { pipeline })
}

/// Bind `listen` and serve requests until the process exits.
pub async fn serve(pipeline: Arc<CaptionPipeline>, listen: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen).await?;
    tracing::info!(addr = %listener.local_addr()?, "caption server listening");
    axum::serve(listener, router(pipeline)).await?;
    Ok(())
}

async fn ping() -> Json<serde_json::Value> {
    Json(json!({"status": "ok"}))
}

async fn generate_subtitles(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Response {
    match state.pipeline.generate_subtitles(&request).await {
        Ok(output) => file_response(output, "application/x-subrip", "captions.srt")
            .await
            .unwrap_or_else(|e| internal_error(e, "error generating subtitles")),
        Err(e) => internal_error(e, "error generating subtitles"),
    }
}

async fn burn_subtitles(
    State(state): State<AppState>,
    Json(request): Json<BurnRequest>,
) -> Response {
    match state.pipeline.burn_subtitles(&request).await {
        Ok(output) => file_response(output, "video/mp4", "captioned.mp4")
            .await
            .unwrap_or_else(|e| internal_error(e, "error burning subtitles")),
        Err(e) => internal_error(e, "error burning subtitles"),
    }
}

/// Stream a produced file back to the caller.
///
/// The [`PipelineOutput`] is captured by the body stream, so the temporary
/// resource set is released only after the transfer finishes or the client
/// disconnects, never while the file is still being read.
async fn file_response(
    output: PipelineOutput,
    content_type: &'static str,
    filename: &'static str,
) -> Result<Response> {
    let file = tokio::fs::File::open(output.path()).await?;
    let stream = ReaderStream::new(file).map(move |chunk| {
        let _workspace = &output;
        chunk
    });

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        )
        .body(Body::from_stream(stream))
        .map_err(|e| crate::error::CaptionError::Other(format!("failed to build response: {e}")))
}

fn internal_error(error: crate::error::CaptionError, public_message: &str) -> Response {
    tracing::error!(error = %error, "pipeline request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": public_message})),
    )
        .into_response()
}
