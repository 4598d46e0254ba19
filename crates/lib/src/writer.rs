//! # Write-Back Agent
//!
//! Turns each action item into a destination record and annotates the source
//! document with what was done. Record creation tolerates per-item failures; the
//! run only fails when items existed and none of them could be created.

use crate::{
    errors::StoreError,
    store::DocumentStore,
    types::{ActionItem, AnnotationBlock, NewRecord, StructuredMeetingData, WriteBackResult},
};
use std::sync::Arc;
use tracing::{info, warn};

const UNTITLED_ACTION_ITEM: &str = "Untitled action item";
const SUMMARY_ICON: &str = "📝";
const REPORT_ICON: &str = "🤖";

pub struct Writer {
    store: Arc<dyn DocumentStore>,
}

impl Writer {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Creates records for `data.action_items` and appends the annotation to
    /// `document_id`. A failing append is returned as an error.
    pub async fn write(
        &self,
        document_id: &str,
        data: &StructuredMeetingData,
    ) -> Result<WriteBackResult, StoreError> {
        let total = data.action_items.len();
        let mut created_record_ids = Vec::with_capacity(total);

        for (index, item) in data.action_items.iter().enumerate() {
            let record = to_record(document_id, item);
            match self.store.create_record(&record).await {
                Ok(id) => {
                    info!("Created record {id} for action item {}/{total}", index + 1);
                    created_record_ids.push(id);
                }
                Err(e) => {
                    warn!(
                        "Failed to create record for action item {}/{total} ('{}'): {e}",
                        index + 1,
                        record.title
                    );
                }
            }
        }

        if total > 0 && created_record_ids.is_empty() {
            return Ok(WriteBackResult {
                success: false,
                created_record_ids,
                error: Some(format!("none of the {total} action item(s) could be created")),
            });
        }

        let blocks = annotation_blocks(created_record_ids.len(), total, data);
        self.store.append_blocks(document_id, &blocks).await?;

        Ok(WriteBackResult {
            success: true,
            created_record_ids,
            error: None,
        })
    }
}

fn to_record(document_id: &str, item: &ActionItem) -> NewRecord {
    let title = match item.title.trim() {
        "" => UNTITLED_ACTION_ITEM.to_string(),
        title => title.to_string(),
    };
    NewRecord {
        title,
        description: item.description.clone(),
        assignee: item.assignee.clone(),
        due_date: item.due_date.clone(),
        priority: item.priority,
        source_document_id: document_id.to_string(),
    }
}

/// The blocks appended to the source document: a divider, a processing report,
/// the key decisions and the summary.
pub fn annotation_blocks(
    created: usize,
    total: usize,
    data: &StructuredMeetingData,
) -> Vec<AnnotationBlock> {
    let report = if created == total {
        format!("Meeting processed: {created} task(s) created from action items.")
    } else {
        format!("Meeting processed: {created} of {total} task(s) created from action items.")
    };

    let mut blocks = vec![
        AnnotationBlock::Divider,
        AnnotationBlock::Callout {
            icon: REPORT_ICON.to_string(),
            text: report,
        },
    ];

    if !data.key_decisions.is_empty() {
        blocks.push(AnnotationBlock::Heading("Key decisions".to_string()));
        blocks.extend(data.key_decisions.iter().map(|decision| {
            let text = match &decision.description {
                Some(description) => format!("{}: {description}", decision.title),
                None => decision.title.clone(),
            };
            AnnotationBlock::Bullet(text)
        }));
    }

    if let Some(summary) = data.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        blocks.push(AnnotationBlock::Heading("Summary".to_string()));
        blocks.push(AnnotationBlock::Callout {
            icon: SUMMARY_ICON.to_string(),
            text: summary.to_string(),
        });
    }

    blocks
}
