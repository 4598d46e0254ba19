//! # Application State
//!
//! Builds the pipeline from configuration and shares the [`Coordinator`] with
//! every request handler. Every component gets its collaborators passed in;
//! the store client is created once and shared.

use minutes::{
    analyst::Analyst,
    config::PipelineConfig,
    coordinator::{Coordinator, CoordinatorSettings},
    extract::HybridExtractor,
    pipeline::Pipeline,
    providers::factory::create_provider,
    retry::RetryPolicy,
    store::DocumentStore,
    writer::Writer,
};
use minutes_browser::BrowserExtractor;
use minutes_notion::{ApiExtractor, NotionClient, NotionStore, StoreSettings};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<Coordinator>,
}

impl AppState {
    pub fn new(coordinator: Arc<Coordinator>) -> Self {
        Self { coordinator }
    }
}

/// Wires the store client, both extractors, the model provider and the
/// coordinator from `config`.
pub fn build_app_state(config: &PipelineConfig) -> anyhow::Result<AppState> {
    let client = NotionClient::from_config(&config.extraction)?;
    let store: Arc<dyn DocumentStore> = Arc::new(NotionStore::new(
        client.clone(),
        StoreSettings::from_config(config),
    ));

    let extractor = HybridExtractor::new(
        Arc::new(ApiExtractor::new(client)),
        Arc::new(BrowserExtractor::from_config(&config.extraction)),
    )
    .with_retry_policy(RetryPolicy::new(config.extraction.browser_max_retries))
    .with_min_content_length(config.extraction.min_content_length);

    let analyst = Analyst::new(create_provider(&config.model)?)
        .with_temperature(config.model.temperature);
    let pipeline = Pipeline::new(extractor, analyst, Writer::new(store.clone()));

    let settings = CoordinatorSettings {
        poll_interval: config.poll_interval,
        error_retry_delay: config.error_retry_delay,
        stale_processing_after: config.stale_processing_after,
    };
    info!(
        "Watching collection {} (status property '{}')",
        config.source_collection_id, config.status_property.name
    );

    Ok(AppState::new(Arc::new(Coordinator::new(
        store, pipeline, settings,
    ))))
}
