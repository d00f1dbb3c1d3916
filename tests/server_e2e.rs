//! End-to-end tests over the HTTP surface: real sockets, real request
//! bodies, mock transcription and render backends.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use captiond::config::Config;
use captiond::pipeline::CaptionPipeline;
use captiond::render::MockRenderer;
use captiond::stt::transcriber::MockTranscriber;
use captiond::subtitle::cue::TranscriptSegment;
use captiond::{SubtitleRenderer, Transcriber};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

async fn spawn_fixture_server() -> SocketAddr {
    let app = Router::new()
        .route("/video.mp4", get(|| async { &b"fake video payload"[..] }))
        .route(
            "/subs.srt",
            get(|| async { "1\n00:00:00,000 --> 00:00:02,000\nHello.\n\n" }),
        )
        .route("/font.ttf", get(|| async { &b"fake font payload"[..] }))
        .route("/missing.mp4", get(|| async { StatusCode::NOT_FOUND }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn spawn_caption_server(
    workdir: &Path,
    transcriber: Arc<dyn Transcriber>,
    renderer: Arc<dyn SubtitleRenderer>,
) -> SocketAddr {
    let mut config = Config::default();
    config.storage.workdir = workdir.to_path_buf();
    config.fetch.timeout_secs = 5;
    let pipeline = Arc::new(
        CaptionPipeline::from_config(&config)
            .unwrap()
            .with_transcriber(transcriber)
            .with_renderer(renderer),
    );

    let app = captiond::server::router(pipeline);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Cleanup runs when the response body stream is dropped server-side,
/// which can lag the client's final read by a scheduler tick.
async fn wait_for_empty_workdir(workdir: &Path) {
    for _ in 0..40 {
        let empty = std::fs::read_dir(workdir).unwrap().next().is_none();
        if empty {
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    let leftover: Vec<_> = std::fs::read_dir(workdir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    panic!("workdir not emptied after response: {leftover:?}");
}

#[tokio::test]
async fn ping_returns_ok_status() {
    let workdir = tempfile::tempdir().unwrap();
    let addr = spawn_caption_server(
        workdir.path(),
        Arc::new(MockTranscriber::new()),
        Arc::new(MockRenderer::new()),
    )
    .await;

    let response = reqwest::get(format!("http://{addr}/ping")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"status": "ok"}));
}

#[tokio::test]
async fn generate_subtitles_streams_srt_file() {
    let fixtures = spawn_fixture_server().await;
    let workdir = tempfile::tempdir().unwrap();

    let transcriber = MockTranscriber::new().with_segments(vec![TranscriptSegment {
        start: 0.0,
        end: 4.0,
        text: "Hello world. How are you?".to_string(),
    }]);
    let addr = spawn_caption_server(
        workdir.path(),
        Arc::new(transcriber),
        Arc::new(MockRenderer::new()),
    )
    .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/generate-subtitles"))
        .json(&serde_json::json!({"video_url": format!("http://{fixtures}/video.mp4")}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .unwrap(),
        "application/x-subrip"
    );

    let body = response.text().await.unwrap();
    assert_eq!(
        body,
        "1\n00:00:00,000 --> 00:00:02,000\nHello world.\n\n\
         2\n00:00:02,000 --> 00:00:04,000\nHow are you?\n\n"
    );

    wait_for_empty_workdir(workdir.path()).await;
}

#[tokio::test]
async fn burn_subtitles_streams_rendered_video() {
    let fixtures = spawn_fixture_server().await;
    let workdir = tempfile::tempdir().unwrap();

    let addr = spawn_caption_server(
        workdir.path(),
        Arc::new(MockTranscriber::new()),
        Arc::new(MockRenderer::new().with_output_bytes(b"rendered video bytes")),
    )
    .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/burn-subtitles"))
        .json(&serde_json::json!({
            "video_url": format!("http://{fixtures}/video.mp4"),
            "srt_url": format!("http://{fixtures}/subs.srt"),
            "font_url": format!("http://{fixtures}/font.ttf"),
            "style": "FontName=Arial,FontSize=30",
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .unwrap(),
        "video/mp4"
    );
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"rendered video bytes");

    wait_for_empty_workdir(workdir.path()).await;
}

#[tokio::test]
async fn failing_stage_returns_generic_error_and_cleans_up() {
    let fixtures = spawn_fixture_server().await;
    let workdir = tempfile::tempdir().unwrap();

    let addr = spawn_caption_server(
        workdir.path(),
        Arc::new(MockTranscriber::new().with_failure()),
        Arc::new(MockRenderer::new()),
    )
    .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/generate-subtitles"))
        .json(&serde_json::json!({"video_url": format!("http://{fixtures}/video.mp4")}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    // Generic message only; the upstream detail stays in the log
    assert_eq!(body, serde_json::json!({"error": "error generating subtitles"}));

    wait_for_empty_workdir(workdir.path()).await;
}

#[tokio::test]
async fn fetch_failure_returns_generic_error() {
    let fixtures = spawn_fixture_server().await;
    let workdir = tempfile::tempdir().unwrap();

    let addr = spawn_caption_server(
        workdir.path(),
        Arc::new(MockTranscriber::new()),
        Arc::new(MockRenderer::new()),
    )
    .await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/burn-subtitles"))
        .json(&serde_json::json!({
            "video_url": format!("http://{fixtures}/video.mp4"),
            "srt_url": format!("http://{fixtures}/subs.srt"),
            "font_url": format!("http://{fixtures}/missing.mp4"),
        }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, serde_json::json!({"error": "error burning subtitles"}));

    wait_for_empty_workdir(workdir.path()).await;
}
