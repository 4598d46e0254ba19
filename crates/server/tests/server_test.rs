//! # Server Endpoint Tests
//!
//! Health checks, the synchronous process and extract endpoints, and the
//! combined server plus polling loop.

mod common;

use anyhow::Result;
use common::{build_state, TestApp, ANALYST_JSON, LONG_NOTES};
use minutes::{errors::ExtractError, types::PageStatus};
use minutes_test_utils::{MemoryStore, MockAiProvider, ScriptedExtractor};
use serde_json::Value;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_root_and_health_check_endpoints() -> Result<()> {
    // --- 1. Arrange ---
    let app = TestApp::spawn_happy(MemoryStore::new()).await?;

    // --- 2. Act ---
    let root_response = app.client.get(app.url("/")).send().await?;
    let health_response = app.client.get(app.url("/health")).send().await?;

    // --- 3. Assert ---
    assert!(root_response.status().is_success());
    assert_eq!("minutes server is running.", root_response.text().await?);
    assert!(health_response.status().is_success());
    assert_eq!("OK", health_response.text().await?);
    Ok(())
}

#[tokio::test]
async fn test_process_runs_the_full_state_machine() -> Result<()> {
    // --- 1. Arrange ---
    let store = MemoryStore::new();
    store.add_document("page-1", "Weekly sync", PageStatus::Ready);
    let app = TestApp::spawn_happy(store).await?;

    // --- 2. Act ---
    let response = app
        .client
        .post(app.url("/pages/page-1/process"))
        .send()
        .await?;

    // --- 3. Assert ---
    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await?;
    assert_eq!(body["status"], "done");
    assert_eq!(body["method"], "api");
    assert_eq!(body["createdRecordIds"], serde_json::json!(["record-1"]));
    assert!(body.get("error").is_none());

    assert_eq!(
        app.store.status_history("page-1"),
        vec![PageStatus::Processing, PageStatus::Done]
    );
    let records = app.store.created_records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].1.title, "Send the Q3 report");
    Ok(())
}

#[tokio::test]
async fn test_process_skips_a_document_that_is_not_ready() -> Result<()> {
    let store = MemoryStore::new();
    store.add_document("page-1", "Already handled", PageStatus::Done);
    let app = TestApp::spawn_happy(store).await?;

    let response = app
        .client
        .post(app.url("/pages/page-1/process"))
        .send()
        .await?;

    assert_eq!(409, response.status().as_u16());
    let body: Value = response.json().await?;
    assert_eq!(body["status"], "skipped");
    assert_eq!(body["error"], "status is Done");
    assert!(app.store.status_history("page-1").is_empty());
    assert!(app.store.created_records().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_process_failure_marks_the_document_error() -> Result<()> {
    // --- 1. Arrange ---
    let store = MemoryStore::new();
    store.add_document("page-1", "Weekly sync", PageStatus::Ready);
    let app = TestApp::spawn_with(
        store,
        ScriptedExtractor::failing(ExtractError::Api("401 unauthorized".to_string())),
        ScriptedExtractor::failing(ExtractError::MissingSession("no session".to_string())),
        MockAiProvider::new(),
    )
    .await?;

    // --- 2. Act ---
    let response = app
        .client
        .post(app.url("/pages/page-1/process"))
        .send()
        .await?;

    // --- 3. Assert ---
    assert_eq!(500, response.status().as_u16());
    let body: Value = response.json().await?;
    assert_eq!(body["status"], "failed");
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("extraction failed"), "{error}");
    assert!(error.contains("401 unauthorized"));
    assert!(error.contains("no session"));
    assert_eq!(app.store.status_of("page-1"), Some(PageStatus::Error));
    Ok(())
}

#[tokio::test]
async fn test_process_unknown_document_is_not_found() -> Result<()> {
    let app = TestApp::spawn_happy(MemoryStore::new()).await?;

    let response = app
        .client
        .post(app.url("/pages/missing/process"))
        .send()
        .await?;

    assert_eq!(404, response.status().as_u16());
    let body: Value = response.json().await?;
    assert_eq!(body["error"], "Document not found: missing");
    Ok(())
}

#[tokio::test]
async fn test_extract_returns_content_without_writing() -> Result<()> {
    let store = MemoryStore::new();
    store.add_document("page-1", "Weekly sync", PageStatus::Ready);
    let app = TestApp::spawn_happy(store).await?;

    let response = app
        .client
        .post(app.url("/pages/page-1/extract"))
        .send()
        .await?;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["method"], "api");
    assert_eq!(body["content"], LONG_NOTES);
    assert!(app.store.status_history("page-1").is_empty());
    assert!(app.store.created_records().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_extract_failure_reports_both_tiers() -> Result<()> {
    let app = TestApp::spawn_with(
        MemoryStore::new(),
        ScriptedExtractor::returning("", false),
        ScriptedExtractor::failing(ExtractError::ContentNotFound("empty page".to_string())),
        MockAiProvider::new(),
    )
    .await?;

    let response = app
        .client
        .post(app.url("/pages/page-1/extract"))
        .send()
        .await?;

    assert_eq!(500, response.status().as_u16());
    let body: Value = response.json().await?;
    assert_eq!(body["success"], false);
    assert!(body.get("content").is_none());
    let error = body["error"].as_str().unwrap();
    assert!(error.starts_with("API: API content insufficient"), "{error}");
    assert!(error.contains("empty page"));
    Ok(())
}

#[tokio::test]
async fn test_run_polls_and_stops_on_cancel() -> Result<()> {
    // --- 1. Arrange ---
    common::setup_tracing();
    let store = MemoryStore::new();
    store.add_document("page-1", "Weekly sync", PageStatus::Ready);
    let ai = MockAiProvider::new();
    ai.add_response(ANALYST_JSON);
    let state = build_state(
        &store,
        ScriptedExtractor::returning(LONG_NOTES, true),
        ScriptedExtractor::returning("unused", false),
        ai,
    );
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = format!("http://{}", listener.local_addr()?);
    let shutdown = CancellationToken::new();
    let server = tokio::spawn(minutes_server::run(listener, state, shutdown.clone()));

    // --- 2. Act ---
    let mut done = false;
    for _ in 0..100 {
        if store.status_of("page-1") == Some(PageStatus::Done) {
            done = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let health = reqwest::get(format!("{address}/health")).await?;
    shutdown.cancel();
    let finished = tokio::time::timeout(Duration::from_secs(5), server).await;

    // --- 3. Assert ---
    assert!(done, "the polling loop never finished page-1");
    assert_eq!("OK", health.text().await?);
    assert!(matches!(finished, Ok(Ok(Ok(())))));
    Ok(())
}
