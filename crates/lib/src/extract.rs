//! # Hybrid Extraction
//!
//! Raw meeting text comes from one of two tiers: the structured API, which is
//! cheap but may miss embedded transcription widgets, and a headless browser,
//! which renders everything but is slow and brittle. The API tier runs first;
//! the browser tier runs only when the API result is unusable and is wrapped in
//! bounded retry.

use crate::{
    config::DEFAULT_MIN_CONTENT_LENGTH,
    errors::ExtractError,
    retry::{retry_with_backoff, RetryPolicy},
    types::{ExtractedContent, ExtractionMethod, ExtractionResult},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

/// One extraction tier.
#[async_trait]
pub trait ContentExtractor: Send + Sync {
    async fn extract(&self, document_id: &str) -> Result<ExtractedContent, ExtractError>;
}

pub struct HybridExtractor {
    api: Arc<dyn ContentExtractor>,
    browser: Arc<dyn ContentExtractor>,
    retry: RetryPolicy,
    min_content_length: usize,
}

impl HybridExtractor {
    pub fn new(api: Arc<dyn ContentExtractor>, browser: Arc<dyn ContentExtractor>) -> Self {
        Self {
            api,
            browser,
            retry: RetryPolicy::default(),
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_min_content_length(mut self, min_content_length: usize) -> Self {
        self.min_content_length = min_content_length;
        self
    }

    /// An API result is usable when it is non-empty and either came from a
    /// located section or is longer than the configured minimum.
    pub fn is_sufficient(&self, content: &ExtractedContent) -> bool {
        !content.text.trim().is_empty()
            && (content.marker_found || content.text.chars().count() > self.min_content_length)
    }

    pub async fn extract(&self, document_id: &str) -> ExtractionResult {
        let api_error = match self.api.extract(document_id).await {
            Ok(content) if self.is_sufficient(&content) => {
                info!(
                    "API extraction succeeded for {document_id} ({} chars, marker found: {})",
                    content.text.chars().count(),
                    content.marker_found
                );
                return ExtractionResult::success(content.text, ExtractionMethod::Api);
            }
            Ok(content) => {
                let reason = format!(
                    "API content insufficient ({} chars, no section marker)",
                    content.text.chars().count()
                );
                info!("{reason} for {document_id}, falling back to browser");
                reason
            }
            Err(e) => {
                warn!("API extraction failed for {document_id}: {e}. Falling back to browser");
                e.to_string()
            }
        };

        let outcome = retry_with_backoff(
            &self.retry,
            move |_attempt| self.browser.extract(document_id),
            ExtractError::is_retryable,
        )
        .await;

        match outcome {
            Ok(content) if !content.text.trim().is_empty() => {
                info!(
                    "Browser extraction succeeded for {document_id} ({} chars)",
                    content.text.chars().count()
                );
                ExtractionResult::success(content.text, ExtractionMethod::Browser)
            }
            Ok(_) => ExtractionResult::failure(format!(
                "API: {api_error}; browser: no content found"
            )),
            Err(e) => ExtractionResult::failure(format!("API: {api_error}; browser: {e}")),
        }
    }
}
