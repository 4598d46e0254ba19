//! [`DocumentStore`] backed by two Notion databases: the source collection of
//! meeting pages and the destination collection of tasks.

use crate::{
    blocks::{paragraph, to_block},
    client::NotionClient,
    errors::NotionError,
    properties::{page_url, parse_document, record_properties, status_filter, status_update},
};
use async_trait::async_trait;
use minutes::{
    config::{PipelineConfig, StatusProperty, TaskProperties},
    errors::StoreError,
    store::DocumentStore,
    types::{AnnotationBlock, NewRecord, PageStatus, TargetDocument},
};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

/// Notion accepts at most this many children per append request.
const MAX_CHILDREN_PER_REQUEST: usize = 100;

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub source_collection_id: String,
    pub destination_collection_id: String,
    pub status_property: StatusProperty,
    pub task_properties: TaskProperties,
    pub web_base_url: String,
}

impl StoreSettings {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            source_collection_id: config.source_collection_id.clone(),
            destination_collection_id: config.destination_collection_id.clone(),
            status_property: config.status_property.clone(),
            task_properties: config.task_properties.clone(),
            web_base_url: config.extraction.web_base_url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotionStore {
    client: NotionClient,
    settings: StoreSettings,
}

impl NotionStore {
    pub fn new(client: NotionClient, settings: StoreSettings) -> Self {
        Self { client, settings }
    }

    fn parse(&self, page: &Value) -> Result<TargetDocument, NotionError> {
        parse_document(page, &self.settings.status_property.name)
            .ok_or_else(|| NotionError::Decode("page object without an id".to_string()))
    }
}

#[async_trait]
impl DocumentStore for NotionStore {
    async fn query_by_status(
        &self,
        status: PageStatus,
    ) -> Result<Vec<TargetDocument>, StoreError> {
        let filter = status_filter(&self.settings.status_property, status);
        let pages = self
            .client
            .query_database(&self.settings.source_collection_id, filter)
            .await?;
        debug!("Query for status '{status}' returned {} page(s)", pages.len());

        let mut documents = Vec::with_capacity(pages.len());
        for page in &pages {
            match self.parse(page) {
                Ok(document) => documents.push(document),
                Err(e) => warn!("Skipping unreadable page in query result: {e}"),
            }
        }
        Ok(documents)
    }

    async fn get_document(&self, document_id: &str) -> Result<TargetDocument, StoreError> {
        let page = self.client.get(&format!("pages/{document_id}"), &[]).await?;
        Ok(self.parse(&page)?)
    }

    async fn update_status(
        &self,
        document_id: &str,
        status: PageStatus,
    ) -> Result<(), StoreError> {
        let body = status_update(&self.settings.status_property, status);
        self.client
            .patch(&format!("pages/{document_id}"), &body)
            .await?;
        info!("Set status of {document_id} to '{status}'");
        Ok(())
    }

    async fn create_record(&self, record: &NewRecord) -> Result<String, StoreError> {
        let source_url = page_url(&self.settings.web_base_url, &record.source_document_id);
        let mut body = json!({
            "parent": { "database_id": self.settings.destination_collection_id },
            "properties": record_properties(record, &self.settings.task_properties, &source_url),
        });
        if let Some(description) = record.description.as_deref().filter(|d| !d.is_empty()) {
            body["children"] = json!([paragraph(description)]);
        }

        let created = self.client.post("pages", &body).await?;
        created
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| StoreError::Payload("created page has no id".to_string()))
    }

    async fn append_blocks(
        &self,
        document_id: &str,
        blocks: &[AnnotationBlock],
    ) -> Result<(), StoreError> {
        let path = format!("blocks/{document_id}/children");
        for chunk in blocks.chunks(MAX_CHILDREN_PER_REQUEST) {
            let children: Vec<Value> = chunk.iter().map(to_block).collect();
            self.client
                .patch(&path, &json!({ "children": children }))
                .await?;
        }
        Ok(())
    }
}
