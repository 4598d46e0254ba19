//! One document's trip through extraction, structured analysis and write-back.

use crate::{
    analyst::Analyst,
    errors::PipelineError,
    extract::HybridExtractor,
    types::ExtractionMethod,
    writer::Writer,
};
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutcome {
    pub method: ExtractionMethod,
    pub action_items: usize,
    pub key_decisions: usize,
    pub created_record_ids: Vec<String>,
}

pub struct Pipeline {
    extractor: HybridExtractor,
    analyst: Analyst,
    writer: Writer,
}

impl Pipeline {
    pub fn new(extractor: HybridExtractor, analyst: Analyst, writer: Writer) -> Self {
        Self {
            extractor,
            analyst,
            writer,
        }
    }

    pub fn extractor(&self) -> &HybridExtractor {
        &self.extractor
    }

    pub async fn run(&self, document_id: &str) -> Result<PipelineOutcome, PipelineError> {
        let extraction = self.extractor.extract(document_id).await;
        let (content, method) = match (extraction.content, extraction.method) {
            (Some(content), Some(method)) if extraction.success => (content, method),
            _ => {
                return Err(PipelineError::Extraction(
                    extraction.error.unwrap_or_else(|| "no content".to_string()),
                ))
            }
        };
        info!(
            "Extracted {} chars from {document_id} via {method}",
            content.chars().count()
        );

        let analysis = self.analyst.analyze(&content).await;
        let data = match analysis.data {
            Some(data) if analysis.success => data,
            _ => {
                if let Some(raw) = &analysis.raw {
                    warn!("Keeping raw model output for {document_id}: {raw}");
                }
                return Err(PipelineError::Analysis(
                    analysis.error.unwrap_or_else(|| "no data".to_string()),
                ));
            }
        };

        let written = self
            .writer
            .write(document_id, &data)
            .await
            .map_err(|e| PipelineError::WriteBack(e.to_string()))?;
        if !written.success {
            return Err(PipelineError::WriteBack(
                written.error.unwrap_or_else(|| "write-back failed".to_string()),
            ));
        }

        Ok(PipelineOutcome {
            method,
            action_items: data.action_items.len(),
            key_decisions: data.key_decisions.len(),
            created_record_ids: written.created_record_ids,
        })
    }
}
