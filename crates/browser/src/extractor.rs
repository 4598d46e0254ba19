//! # Browser Extractor
//!
//! The fallback tier. Opens the document in an authenticated headless browser,
//! scrolls until lazy content has rendered, then locates the meeting notes in a
//! snapshot of the page.

use crate::{
    chrome::ChromeLauncher,
    errors::BrowserError,
    locator::ContentLocator,
    page::{PageDriver, PageLauncher},
    scroll::ScrollLoader,
    session::SessionSource,
};
use async_trait::async_trait;
use minutes::{
    config::ExtractionConfig, errors::ExtractError, extract::ContentExtractor, markers,
    types::ExtractedContent,
};
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

pub struct BrowserExtractor {
    launcher: Arc<dyn PageLauncher>,
    session: SessionSource,
    web_base_url: String,
    navigation_timeout: Duration,
    scroll: ScrollLoader,
    locator: ContentLocator,
}

impl BrowserExtractor {
    pub fn new(
        launcher: Arc<dyn PageLauncher>,
        session: SessionSource,
        web_base_url: &str,
        navigation_timeout: Duration,
        scroll: ScrollLoader,
    ) -> Self {
        Self {
            launcher,
            session,
            web_base_url: web_base_url.trim_end_matches('/').to_string(),
            navigation_timeout,
            scroll,
            locator: ContentLocator::default(),
        }
    }

    /// A headless Chrome extractor configured from the environment.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        let launcher = ChromeLauncher {
            args: vec!["--no-sandbox".to_string(), "--disable-gpu".to_string()],
        };
        Self::new(
            Arc::new(launcher),
            SessionSource::new(
                config.session_file_path.clone(),
                config.session_token.clone(),
                &config.web_base_url,
            ),
            &config.web_base_url,
            config.navigation_timeout,
            ScrollLoader::new(config.scroll),
        )
    }

    pub fn with_locator(mut self, locator: ContentLocator) -> Self {
        self.locator = locator;
        self
    }

    /// The address the document is rendered at: the web base plus the id
    /// without dashes.
    pub fn page_url(&self, document_id: &str) -> String {
        format!("{}/{}", self.web_base_url, document_id.replace('-', ""))
    }

    async fn read_page(
        &self,
        page: &dyn PageDriver,
        document_id: &str,
    ) -> Result<ExtractedContent, BrowserError> {
        let url = self.page_url(document_id);
        debug!("Navigating to {url}");
        page.navigate(&url, self.navigation_timeout).await?;

        let report = self.scroll.load_all(page).await?;
        debug!(
            "Scrolled {} time(s), final height {}px, stabilized: {}",
            report.scrolls, report.final_height, report.stabilized
        );

        let snapshot = page.snapshot().await?;
        let located = self
            .locator
            .locate(&snapshot)
            .ok_or(BrowserError::ContentNotFound)?;
        info!(
            "Located {} chars via '{}' for {document_id}",
            located.text.chars().count(),
            located.strategy
        );

        let marker_found = markers::has_any_marker(&located.text);
        Ok(ExtractedContent {
            text: located.text,
            marker_found,
        })
    }
}

#[async_trait]
impl ContentExtractor for BrowserExtractor {
    async fn extract(&self, document_id: &str) -> Result<ExtractedContent, ExtractError> {
        let session = self.session.load().await?;
        let page = self.launcher.launch(&session).await?;

        let result = self.read_page(page.as_ref(), document_id).await;
        if let Err(e) = page.close().await {
            warn!("Failed to close browser for {document_id}: {e}");
        }
        Ok(result?)
    }
}
