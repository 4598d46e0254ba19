//! # Common Test Utilities
//!
//! `TestApp` spawns the router on a random port with a coordinator built from
//! in-memory fakes, so endpoint tests exercise the real state machine without
//! any external service.

// Not every test file uses every helper.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use minutes::{
    analyst::Analyst,
    coordinator::{Coordinator, CoordinatorSettings},
    extract::{ContentExtractor, HybridExtractor},
    pipeline::Pipeline,
    retry::RetryPolicy,
    writer::Writer,
};
use minutes_server::{router, state::AppState};
use minutes_test_utils::{MemoryStore, MockAiProvider, ScriptedExtractor};
use reqwest::Client;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, task::JoinHandle};

/// A model answer with one action item and a summary.
pub const ANALYST_JSON: &str = r#"{
    "actionItems": [{"title": "Send the Q3 report", "assignee": "Dana", "priority": "high"}],
    "keyDecisions": [],
    "summary": "Q3 review."
}"#;

pub const LONG_NOTES: &str = "AI Summary\n\nThe team reviewed Q3 numbers and agreed that Dana sends the report by Friday.";

pub fn settings() -> CoordinatorSettings {
    CoordinatorSettings {
        poll_interval: Duration::from_millis(50),
        error_retry_delay: Duration::from_millis(50),
        stale_processing_after: None,
    }
}

pub fn build_state(
    store: &MemoryStore,
    api: ScriptedExtractor,
    browser: ScriptedExtractor,
    ai: MockAiProvider,
) -> AppState {
    let extractor = HybridExtractor::new(Arc::new(api), Arc::new(browser)).with_retry_policy(
        RetryPolicy {
            max_attempts: 2,
            base_delay: Duration::from_millis(5),
        },
    );
    let pipeline = Pipeline::new(
        extractor,
        Analyst::new(Box::new(ai)),
        Writer::new(Arc::new(store.clone())),
    );
    AppState::new(Arc::new(Coordinator::new(
        Arc::new(store.clone()),
        pipeline,
        settings(),
    )))
}

pub fn setup_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .with_test_writer()
        .try_init();
}

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub store: MemoryStore,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Serves the router only; the polling loop is not started.
    pub async fn spawn_with(
        store: MemoryStore,
        api: ScriptedExtractor,
        browser: ScriptedExtractor,
        ai: MockAiProvider,
    ) -> Result<Self> {
        setup_tracing();
        let app_state = build_state(&store, api, browser, ai);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        Ok(Self {
            address,
            client: Client::new(),
            store,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// A harness whose extractors and model succeed.
    pub async fn spawn_happy(store: MemoryStore) -> Result<Self> {
        let ai = MockAiProvider::new();
        ai.add_response(ANALYST_JSON);
        Self::spawn_with(
            store,
            ScriptedExtractor::returning(LONG_NOTES, true),
            ScriptedExtractor::returning("unused", false),
            ai,
        )
        .await
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
