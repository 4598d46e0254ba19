//! # Coordinator
//!
//! Polls the source collection for documents in the `Ready` state and drives
//! each one through the pipeline, one at a time:
//!
//! ```text
//! Ready --claim--> Processing --ok--> Done
//!                            \--err--> Error
//! ```
//!
//! A failing document never stops the loop, and a failing poll never stops the
//! process: the loop waits for the error delay and tries again.

use crate::{
    errors::StoreError,
    pipeline::{Pipeline, PipelineOutcome},
    store::DocumentStore,
    types::{PageStatus, TargetDocument},
};
use chrono::Utc;
use futures::FutureExt;
use serde::Serialize;
use std::{panic::AssertUnwindSafe, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorSettings {
    pub poll_interval: Duration,
    pub error_retry_delay: Duration,
    /// Documents left in `Processing` longer than this are moved to `Error` at
    /// the start of a cycle. Disabled when `None`.
    pub stale_processing_after: Option<Duration>,
}

impl Default for CoordinatorSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(crate::config::DEFAULT_POLL_INTERVAL_MS),
            error_retry_delay: Duration::from_millis(crate::config::DEFAULT_ERROR_RETRY_DELAY_MS),
            stale_processing_after: None,
        }
    }
}

/// Counters for one poll cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub found: usize,
    pub done: usize,
    pub failed: usize,
    pub skipped: usize,
    pub recovered: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum DocumentOutcome {
    Done(PipelineOutcome),
    Failed { error: String },
    Skipped { reason: String },
}

pub struct Coordinator {
    store: Arc<dyn DocumentStore>,
    pipeline: Pipeline,
    settings: CoordinatorSettings,
    /// Serializes document processing between the poll loop and manual triggers.
    processing: Mutex<()>,
}

impl Coordinator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        pipeline: Pipeline,
        settings: CoordinatorSettings,
    ) -> Self {
        Self {
            store,
            pipeline,
            settings,
            processing: Mutex::new(()),
        }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Polls until `cancel` fires. Cancellation is observed between cycles and
    /// during the sleep; an in-flight document is finished first.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            "Coordinator started (poll interval {}ms, error delay {}ms)",
            self.settings.poll_interval.as_millis(),
            self.settings.error_retry_delay.as_millis()
        );
        self.run_loop(&cancel, None).await;
        info!("Coordinator stopped");
    }

    /// Runs exactly `cycles` poll cycles with the usual delays between them.
    pub async fn run_cycles(&self, cycles: usize) -> Vec<Result<CycleReport, StoreError>> {
        self.run_loop(&CancellationToken::new(), Some(cycles)).await
    }

    async fn run_loop(
        &self,
        cancel: &CancellationToken,
        limit: Option<usize>,
    ) -> Vec<Result<CycleReport, StoreError>> {
        let mut reports = Vec::new();

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let outcome = AssertUnwindSafe(self.run_cycle()).catch_unwind().await;
            let delay = match &outcome {
                Ok(Ok(report)) => {
                    if report.found == 0 {
                        debug!("No documents ready, sleeping");
                    } else {
                        info!(
                            "Cycle finished: {} found, {} done, {} failed, {} skipped",
                            report.found, report.done, report.failed, report.skipped
                        );
                    }
                    self.settings.poll_interval
                }
                Ok(Err(e)) => {
                    error!(
                        "Poll cycle failed: {e}. Retrying in {}ms",
                        self.settings.error_retry_delay.as_millis()
                    );
                    self.settings.error_retry_delay
                }
                Err(_) => {
                    error!(
                        "Poll cycle panicked. Retrying in {}ms",
                        self.settings.error_retry_delay.as_millis()
                    );
                    self.settings.error_retry_delay
                }
            };

            reports.push(match outcome {
                Ok(result) => result,
                Err(_) => Err(StoreError::Request("poll cycle panicked".to_string())),
            });

            if limit.is_some_and(|n| reports.len() >= n) {
                break;
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        reports
    }

    /// One poll: optional stale sweep, query `Ready`, process each in order.
    pub async fn run_cycle(&self) -> Result<CycleReport, StoreError> {
        let mut report = CycleReport::default();

        if let Some(threshold) = self.settings.stale_processing_after {
            match self.recover_stale(threshold).await {
                Ok(n) => report.recovered = n,
                Err(e) => warn!("Stale document sweep failed: {e}"),
            }
        }

        let documents = self.store.query_by_status(PageStatus::Ready).await?;
        report.found = documents.len();
        if !documents.is_empty() {
            info!("Found {} document(s) ready to process", documents.len());
        }

        for document in &documents {
            match self.process_document(document).await {
                DocumentOutcome::Done(_) => report.done += 1,
                DocumentOutcome::Failed { .. } => report.failed += 1,
                DocumentOutcome::Skipped { .. } => report.skipped += 1,
            }
        }

        Ok(report)
    }

    /// Processes a single document by id, subject to the same claim rules as
    /// the poll loop.
    pub async fn process_by_id(&self, document_id: &str) -> Result<DocumentOutcome, StoreError> {
        let document = self.store.get_document(document_id).await?;
        Ok(self.process_document(&document).await)
    }

    pub async fn process_document(&self, document: &TargetDocument) -> DocumentOutcome {
        let _guard = self.processing.lock().await;
        let id = document.id.as_str();

        match self.claim(id).await {
            Ok(None) => {}
            Ok(Some(current)) => {
                info!("Skipping {id}: status is {current}");
                return DocumentOutcome::Skipped {
                    reason: format!("status is {current}"),
                };
            }
            Err(e) => {
                error!("Could not claim {id}: {e}");
                return DocumentOutcome::Failed {
                    error: e.to_string(),
                };
            }
        }

        info!("Processing '{}' ({id})", document.title);
        let error = match self.pipeline.run(id).await {
            Ok(outcome) => match self.store.update_status(id, PageStatus::Done).await {
                Ok(()) => {
                    info!(
                        "Document {id} done: {} record(s) created via {}",
                        outcome.created_record_ids.len(),
                        outcome.method
                    );
                    return DocumentOutcome::Done(outcome);
                }
                Err(e) => format!("could not mark document done: {e}"),
            },
            Err(e) => e.to_string(),
        };

        error!("Document {id} failed: {error}");
        self.mark_error(id).await;
        DocumentOutcome::Failed { error }
    }

    /// Re-reads the status and moves `Ready` to `Processing`. Returns the
    /// current status when the document is no longer `Ready`.
    async fn claim(&self, document_id: &str) -> Result<Option<String>, StoreError> {
        let current = self.store.get_document(document_id).await?.status;
        if current != Some(PageStatus::Ready) {
            return Ok(Some(
                current.map_or_else(|| "unset".to_string(), |s| s.to_string()),
            ));
        }
        self.store
            .update_status(document_id, PageStatus::Processing)
            .await?;
        Ok(None)
    }

    async fn mark_error(&self, document_id: &str) {
        if let Err(e) = self.store.update_status(document_id, PageStatus::Error).await {
            error!(
                "Could not set {document_id} to Error ({e}); it stays in Processing and needs manual attention"
            );
        }
    }

    async fn recover_stale(&self, threshold: Duration) -> Result<usize, StoreError> {
        let _guard = self.processing.lock().await;
        let threshold = chrono::Duration::from_std(threshold)
            .map_err(|e| StoreError::Payload(e.to_string()))?;
        let cutoff = Utc::now() - threshold;

        let mut recovered = 0;
        for document in self.store.query_by_status(PageStatus::Processing).await? {
            let stale = document.last_edited.is_some_and(|edited| edited < cutoff);
            if !stale {
                continue;
            }
            warn!("Document {} has been Processing since before {cutoff}, marking Error", document.id);
            match self.store.update_status(&document.id, PageStatus::Error).await {
                Ok(()) => recovered += 1,
                Err(e) => warn!("Could not recover {}: {e}", document.id),
            }
        }
        Ok(recovered)
    }
}
