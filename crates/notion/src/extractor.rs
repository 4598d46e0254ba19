//! API Extraction Agent: walks a page's block tree through the official API.

use crate::{blocks::block_text, client::NotionClient};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use minutes::{
    errors::ExtractError, extract::ContentExtractor, markers, types::ExtractedContent,
};
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct ApiExtractor {
    client: NotionClient,
}

impl ApiExtractor {
    pub fn new(client: NotionClient) -> Self {
        Self { client }
    }

    /// Text of every block under `page_id`, depth-first in document order.
    pub async fn collect_text(&self, page_id: &str) -> Result<Vec<String>, ExtractError> {
        let root = self.client.list_children(page_id).await?;
        let mut parts = Vec::new();
        self.walk(root, &mut parts).await;
        Ok(parts)
    }

    fn walk<'a>(&'a self, blocks: Vec<Value>, parts: &'a mut Vec<String>) -> BoxFuture<'a, ()> {
        async move {
            for block in blocks {
                if let Some(text) = block_text(&block) {
                    parts.push(text);
                }

                let has_children = block
                    .get("has_children")
                    .and_then(Value::as_bool)
                    .unwrap_or(false);
                let Some(id) = block.get("id").and_then(Value::as_str) else {
                    continue;
                };
                // child pages are separate documents
                if !has_children || block.get("type").and_then(Value::as_str) == Some("child_page") {
                    continue;
                }

                match self.client.list_children(id).await {
                    Ok(children) => self.walk(children, parts).await,
                    Err(e) => warn!("Skipping children of block {id}: {e}"),
                }
            }
        }
        .boxed()
    }
}

#[async_trait]
impl ContentExtractor for ApiExtractor {
    async fn extract(&self, document_id: &str) -> Result<ExtractedContent, ExtractError> {
        let parts = self.collect_text(document_id).await?;
        let text = parts.join("\n\n");
        debug!(
            "Collected {} block(s), {} chars from {document_id}",
            parts.len(),
            text.chars().count()
        );

        match markers::extract_section(&text) {
            Some(section) => {
                info!("Found meeting notes section in {document_id} via API");
                Ok(ExtractedContent {
                    text: section,
                    marker_found: true,
                })
            }
            None => Ok(ExtractedContent {
                text,
                marker_found: false,
            }),
        }
    }
}
