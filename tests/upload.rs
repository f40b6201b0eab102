//! HTTP integration tests for pdfdrop.
//!
//! Each test starts a local axum server that speaks the processing service's
//! protocol (multipart `POST /upload`, JSON answer, `GET /download/:name`)
//! and records what it received. No external network access is needed.
//!
//! Run with:
//!   cargo test --test upload -- --nocapture

use axum::extract::{Multipart, Path as UrlPath, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use pdfdrop::{
    HttpUploader, MemoryView, Messages, Region, SelectedFile, Submission, UploadConfig,
    UploadError, UploadOptions, UploadWidget, ViewState, WidgetEvent,
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ── Test server ──────────────────────────────────────────────────────────────

/// One multipart request as the server saw it.
#[derive(Debug, Default, Clone)]
struct Captured {
    fields: HashMap<String, String>,
    file_name: Option<String>,
    content_type: Option<String>,
    file_bytes: Vec<u8>,
}

#[derive(Clone)]
enum Reply {
    Json(StatusCode, serde_json::Value),
    Raw(&'static str),
    Hang,
}

#[derive(Clone)]
struct AppState {
    reply: Reply,
    received: Arc<Mutex<Vec<Captured>>>,
}

const PROCESSED: &[u8] = b"%PDF-1.7\n% processed\n";

async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut captured = Captured::default();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or("").to_string();
        if name == "file" {
            captured.file_name = field.file_name().map(str::to_string);
            captured.content_type = field.content_type().map(str::to_string);
            captured.file_bytes = field.bytes().await.unwrap().to_vec();
        } else {
            captured.fields.insert(name, field.text().await.unwrap());
        }
    }
    state.received.lock().unwrap().push(captured);

    match state.reply {
        Reply::Json(status, body) => (status, Json(body)).into_response(),
        Reply::Raw(body) => (StatusCode::BAD_GATEWAY, body).into_response(),
        Reply::Hang => {
            tokio::time::sleep(Duration::from_secs(30)).await;
            StatusCode::OK.into_response()
        }
    }
}

async fn download(UrlPath(name): UrlPath<String>) -> Response {
    if name == "out.pdf" {
        PROCESSED.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Start a server with a fixed reply; returns its base URL and request log.
async fn spawn_server(reply: Reply) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = AppState {
        reply,
        received: received.clone(),
    };
    let app = Router::new()
        .route("/upload", post(upload))
        .route("/download/:name", get(download))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), received)
}

fn success() -> Reply {
    Reply::Json(
        StatusCode::OK,
        json!({ "success": true, "filename": "out.pdf", "download_url": "/download/out.pdf" }),
    )
}

fn widget_for(base: &str) -> UploadWidget<MemoryView, HttpUploader> {
    let config = UploadConfig::builder()
        .server_url(base)
        .timeout_secs(10)
        .build()
        .unwrap();
    let messages = Messages::new(config.locale);
    UploadWidget::new(MemoryView::new(), HttpUploader::new(config).unwrap(), messages)
}

fn pdf() -> SelectedFile {
    SelectedFile::new("scan.pdf", "application/pdf", b"%PDF-1.4\nfake\n".to_vec())
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn pdf_upload_shows_result() {
    let (base, received) = spawn_server(Reply::Json(
        StatusCode::OK,
        json!({ "filename": "out.pdf", "download_url": "/dl/out.pdf" }),
    ))
    .await;
    let mut widget = widget_for(&base);

    let outcome = widget.handle(WidgetEvent::FileChosen(vec![pdf()])).await;

    assert!(outcome.unwrap().is_completed());
    assert_eq!(widget.state(), ViewState::Result);
    assert_eq!(widget.view().visible_regions(), vec![Region::Result]);
    assert_eq!(widget.view().filename.as_deref(), Some("out.pdf"));
    assert_eq!(widget.view().download_url.as_deref(), Some("/dl/out.pdf"));

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let req = &received[0];
    assert_eq!(req.fields.get("searchable").map(String::as_str), Some("false"));
    assert_eq!(req.fields.get("enhance").map(String::as_str), Some("false"));
    assert_eq!(req.file_name.as_deref(), Some("scan.pdf"));
    assert_eq!(req.content_type.as_deref(), Some("application/pdf"));
    assert_eq!(req.file_bytes, b"%PDF-1.4\nfake\n");
}

#[tokio::test]
async fn checkbox_options_are_sent_as_strings() {
    let (base, received) = spawn_server(success()).await;
    let mut widget = widget_for(&base);
    widget.view_mut().options = UploadOptions::new(true, true);

    widget.submit(pdf()).await;

    let received = received.lock().unwrap();
    assert_eq!(received[0].fields.get("searchable").map(String::as_str), Some("true"));
    assert_eq!(received[0].fields.get("enhance").map(String::as_str), Some("true"));
}

#[tokio::test]
async fn text_file_is_refused_without_request() {
    let (base, received) = spawn_server(success()).await;
    let mut widget = widget_for(&base);

    let file = SelectedFile::new("notes.txt", "text/plain", b"hello".to_vec());
    let outcome = widget.handle(WidgetEvent::Drop(vec![file])).await;

    assert!(matches!(outcome, Some(Submission::Refused(UploadError::NotAPdf { .. }))));
    assert_eq!(widget.state(), ViewState::Idle);
    assert_eq!(widget.view().alerts, vec!["PDFファイルのみ対応しています。"]);
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn server_error_is_alerted_verbatim() {
    let (base, _) = spawn_server(Reply::Json(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "conversion failed" }),
    ))
    .await;
    let mut widget = widget_for(&base);

    let outcome = widget.submit(pdf()).await;

    assert!(matches!(outcome, Submission::Failed(UploadError::Rejected { .. })));
    assert_eq!(widget.state(), ViewState::Idle);
    assert_eq!(widget.view().visible_regions(), vec![Region::DropZone]);
    assert_eq!(widget.view().alerts, vec!["エラー: conversion failed"]);
    assert_eq!(widget.view().filename, None);
    assert_eq!(widget.view().download_url, None);
}

#[tokio::test]
async fn non_json_answer_counts_as_upload_failure() {
    let (base, _) = spawn_server(Reply::Raw("<html>502 Bad Gateway</html>")).await;
    let mut widget = widget_for(&base);

    let outcome = widget.submit(pdf()).await;

    assert!(matches!(
        outcome,
        Submission::Failed(UploadError::MalformedResponse { .. })
    ));
    assert_eq!(widget.state(), ViewState::Idle);
    assert_eq!(widget.view().alerts, vec!["アップロードに失敗しました。"]);
}

#[tokio::test]
async fn unreachable_server_returns_to_idle() {
    // Reserve a port, then free it so nothing is listening there.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut widget = widget_for(&format!("http://{addr}"));
    let outcome = widget.submit(pdf()).await;

    assert!(matches!(outcome, Submission::Failed(UploadError::Transport { .. })));
    assert_eq!(widget.state(), ViewState::Idle);
    assert_eq!(widget.view().alerts, vec!["アップロードに失敗しました。"]);
}

#[tokio::test]
async fn timeout_releases_pending_state() {
    let (base, _) = spawn_server(Reply::Hang).await;
    let config = UploadConfig::builder()
        .server_url(base)
        .timeout_secs(1)
        .build()
        .unwrap();
    let mut widget = UploadWidget::new(
        MemoryView::new(),
        HttpUploader::new(config).unwrap(),
        Messages::default(),
    );

    let outcome = widget.submit(pdf()).await;

    assert!(matches!(
        outcome,
        Submission::Failed(UploadError::Timeout { secs: 1, .. })
    ));
    assert_eq!(widget.state(), ViewState::Idle);
}

#[tokio::test]
async fn reset_then_same_file_uploads_again() {
    let (base, received) = spawn_server(success()).await;
    let mut widget = widget_for(&base);
    let initial = widget.view().drop_zone.clone();

    widget.view_mut().choose("scan.pdf");
    widget.handle(WidgetEvent::FileChosen(vec![pdf()])).await;
    widget.handle(WidgetEvent::Reset).await;

    assert_eq!(widget.state(), ViewState::Idle);
    assert_eq!(widget.view().drop_zone, initial);
    assert_eq!(widget.view().file_input, None);

    widget.handle(WidgetEvent::FileChosen(vec![pdf()])).await;
    assert_eq!(widget.state(), ViewState::Result);
    assert_eq!(received.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn download_saves_processed_file() {
    let (base, _) = spawn_server(success()).await;
    let mut widget = widget_for(&base);

    let receipt = match widget.submit(pdf()).await {
        Submission::Completed(receipt) => receipt,
        other => panic!("expected a receipt, got {other:?}"),
    };

    let dir = tempfile::tempdir().unwrap();
    let path = widget.uploader().download(&receipt, dir.path()).await.unwrap();

    assert_eq!(path, dir.path().join("out.pdf"));
    assert_eq!(std::fs::read(&path).unwrap(), PROCESSED);
}

#[tokio::test]
async fn download_of_missing_file_fails() {
    let (base, _) = spawn_server(success()).await;
    let config = UploadConfig::builder().server_url(base).build().unwrap();
    let uploader = HttpUploader::new(config).unwrap();
    let receipt = pdfdrop::UploadReceipt {
        filename: "gone.pdf".into(),
        download_url: "/download/gone.pdf".into(),
    };

    let dir = tempfile::tempdir().unwrap();
    let err = uploader.download(&receipt, dir.path()).await.unwrap_err();

    assert!(matches!(err, UploadError::DownloadFailed { .. }), "got: {err}");
    assert!(err.to_string().contains("404"));
}
