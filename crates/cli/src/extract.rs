use anyhow::{anyhow, Result};
use clap::ValueEnum;
use minutes::{
    config::ExtractionConfig,
    errors::ExtractError,
    extract::{ContentExtractor, HybridExtractor},
    retry::{retry_with_backoff, RetryPolicy},
    types::{ExtractedContent, ExtractionMethod, ExtractionResult},
};
use minutes_browser::BrowserExtractor;
use minutes_notion::{ApiExtractor, NotionClient};
use std::sync::Arc;
use tracing::info;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// The official API first, the browser when that falls short
    Hybrid,
    /// The official API only
    Api,
    /// The headless browser only, with retry
    Browser,
}

/// Pulls the meeting text out of `document_id` with the chosen method.
pub async fn extract(
    config: &ExtractionConfig,
    document_id: &str,
    method: Method,
) -> Result<ExtractionResult> {
    let client = NotionClient::from_config(config)?;
    let api = Arc::new(ApiExtractor::new(client));
    let retry = RetryPolicy::new(config.browser_max_retries);
    info!("Extracting {document_id} using the {method:?} method");

    let result = match method {
        Method::Hybrid => {
            let browser = Arc::new(BrowserExtractor::from_config(config));
            HybridExtractor::new(api, browser)
                .with_retry_policy(retry)
                .with_min_content_length(config.min_content_length)
                .extract(document_id)
                .await
        }
        Method::Api => into_result(api.extract(document_id).await, ExtractionMethod::Api),
        Method::Browser => {
            let extractor = BrowserExtractor::from_config(config);
            let browser = &extractor;
            match retry_with_backoff(
                &retry,
                move |_attempt| browser.extract(document_id),
                ExtractError::is_retryable,
            )
            .await
            {
                Ok(content) => into_result(Ok(content), ExtractionMethod::Browser),
                Err(e) => ExtractionResult::failure(format!("browser: {e}")),
            }
        }
    };

    if result.success {
        Ok(result)
    } else {
        Err(anyhow!(result
            .error
            .unwrap_or_else(|| "extraction failed".to_string())))
    }
}

fn into_result(
    outcome: Result<ExtractedContent, ExtractError>,
    method: ExtractionMethod,
) -> ExtractionResult {
    match outcome {
        Ok(content) if !content.text.trim().is_empty() => {
            ExtractionResult::success(content.text, method)
        }
        Ok(_) => ExtractionResult::failure(format!("{method}: no content found")),
        Err(e) => ExtractionResult::failure(format!("{method}: {e}")),
    }
}
