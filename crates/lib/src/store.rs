//! # Document Store Seam
//!
//! The coordinator and the write-back agent talk to the collaboration service
//! only through this trait. The production implementation is an HTTP client
//! constructed once at startup and shared as `Arc<dyn DocumentStore>`.

use crate::errors::StoreError;
use crate::types::{AnnotationBlock, NewRecord, PageStatus, TargetDocument};
use async_trait::async_trait;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Lists the source-collection documents whose status equals `status`, in
    /// the order the store returns them.
    async fn query_by_status(&self, status: PageStatus)
        -> Result<Vec<TargetDocument>, StoreError>;

    /// Re-reads a single document, including its current status.
    async fn get_document(&self, document_id: &str) -> Result<TargetDocument, StoreError>;

    async fn update_status(&self, document_id: &str, status: PageStatus)
        -> Result<(), StoreError>;

    /// Creates one record in the destination collection and returns its id.
    async fn create_record(&self, record: &NewRecord) -> Result<String, StoreError>;

    /// Appends blocks to the end of a source document.
    async fn append_blocks(
        &self,
        document_id: &str,
        blocks: &[AnnotationBlock],
    ) -> Result<(), StoreError>;
}
