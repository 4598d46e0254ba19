#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared setup for the integration tests in this crate.

use minutes::{
    analyst::Analyst,
    extract::{ContentExtractor, HybridExtractor},
    pipeline::Pipeline,
    retry::RetryPolicy,
    store::DocumentStore,
    writer::Writer,
};
use minutes_test_utils::MockAiProvider;
use std::sync::{Arc, Once};
use std::time::Duration;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber once per test binary.
pub fn setup_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter("minutes=debug")
            .try_init();
    });
}

/// A model answer with one action item, one decision and a summary.
pub const ANALYST_JSON: &str = r#"{
    "actionItems": [
        {"title": "Send the Q3 report", "assignee": "Dana", "dueDate": "2024-07-01", "priority": "high"}
    ],
    "keyDecisions": [
        {"title": "Move the launch to August", "description": "Vendor delays"}
    ],
    "summary": "The team reviewed Q3 and moved the launch."
}"#;

/// A short retry policy so tests under paused time stay readable.
pub fn fast_retry(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::from_millis(10),
    }
}

pub fn build_pipeline(
    store: Arc<dyn DocumentStore>,
    api: Arc<dyn ContentExtractor>,
    browser: Arc<dyn ContentExtractor>,
    ai: MockAiProvider,
) -> Pipeline {
    let extractor = HybridExtractor::new(api, browser).with_retry_policy(fast_retry(3));
    Pipeline::new(extractor, Analyst::new(Box::new(ai)), Writer::new(store))
}
