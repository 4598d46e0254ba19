//! # Hybrid Extraction Tests

mod common;

use common::{fast_retry, setup_tracing};
use minutes::{errors::ExtractError, extract::HybridExtractor, types::ExtractionMethod};
use minutes_test_utils::{content, ScriptedExtractor};
use std::sync::Arc;

fn hybrid(api: &ScriptedExtractor, browser: &ScriptedExtractor) -> HybridExtractor {
    HybridExtractor::new(Arc::new(api.clone()), Arc::new(browser.clone()))
        .with_retry_policy(fast_retry(3))
}

#[tokio::test(start_paused = true)]
async fn test_short_api_text_without_marker_falls_back_to_browser() {
    // --- 1. Arrange ---
    setup_tracing();
    let api = ScriptedExtractor::returning(&"x".repeat(40), false);
    let browser = ScriptedExtractor::returning("Rendered meeting transcript", true);

    // --- 2. Act ---
    let result = hybrid(&api, &browser).extract("doc-1").await;

    // --- 3. Assert ---
    assert!(result.success);
    assert_eq!(result.method, Some(ExtractionMethod::Browser));
    assert_eq!(result.content.as_deref(), Some("Rendered meeting transcript"));
    assert_eq!(api.calls(), 1);
    assert_eq!(browser.calls(), 1);
}

#[tokio::test]
async fn test_marked_api_section_is_used_without_browser() {
    let section = format!("Summary\n\n{}", "We agreed on the roadmap. ".repeat(10));
    let api = ScriptedExtractor::returning(&section, true);
    let browser = ScriptedExtractor::returning("unused", true);

    let result = hybrid(&api, &browser).extract("doc-1").await;

    assert!(result.success);
    assert_eq!(result.method, Some(ExtractionMethod::Api));
    assert_eq!(result.content.as_deref(), Some(section.as_str()));
    assert_eq!(browser.calls(), 0);
}

#[tokio::test]
async fn test_long_api_text_without_marker_is_accepted() {
    let api = ScriptedExtractor::returning(&"a".repeat(150), false);
    let browser = ScriptedExtractor::returning("unused", true);

    let result = hybrid(&api, &browser).extract("doc-1").await;

    assert_eq!(result.method, Some(ExtractionMethod::Api));
    assert_eq!(browser.calls(), 0);
}

#[tokio::test]
async fn test_short_text_with_marker_is_accepted() {
    let api = ScriptedExtractor::returning("Summary: ship it", true);
    let browser = ScriptedExtractor::returning("unused", true);

    let result = hybrid(&api, &browser).extract("doc-1").await;

    assert_eq!(result.method, Some(ExtractionMethod::Api));
}

#[tokio::test(start_paused = true)]
async fn test_browser_is_retried_until_success() {
    let api = ScriptedExtractor::failing(ExtractError::Api("403".to_string()));
    let browser = ScriptedExtractor::new(vec![
        Err(ExtractError::Navigation("timeout".to_string())),
        Ok(content("Transcript text", true)),
    ]);

    let result = hybrid(&api, &browser).extract("doc-1").await;

    assert!(result.success);
    assert_eq!(result.method, Some(ExtractionMethod::Browser));
    assert_eq!(browser.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_missing_session_is_not_retried_and_both_errors_surface() {
    // --- 1. Arrange ---
    let api = ScriptedExtractor::failing(ExtractError::Api("unauthorized".to_string()));
    let browser = ScriptedExtractor::failing(ExtractError::MissingSession(
        "no session file".to_string(),
    ));

    // --- 2. Act ---
    let result = hybrid(&api, &browser).extract("doc-1").await;

    // --- 3. Assert ---
    assert!(!result.success);
    assert_eq!(browser.calls(), 1);
    let error = result.error.unwrap();
    assert!(error.contains("unauthorized"), "{error}");
    assert!(error.contains("no session file"), "{error}");
}

#[tokio::test(start_paused = true)]
async fn test_browser_exhausts_retries() {
    let api = ScriptedExtractor::returning("", false);
    let browser =
        ScriptedExtractor::failing(ExtractError::ContentNotFound("no blocks".to_string()));

    let result = hybrid(&api, &browser).extract("doc-1").await;

    assert!(!result.success);
    assert_eq!(browser.calls(), 3);
    assert!(result.error.unwrap().contains("failed after 3 attempt(s)"));
}
