//! # Meeting Minutes Harvester
//!
//! Watches a collection of meeting documents, pulls the meeting-notes section
//! out of each ready document, asks a language model for action items, key
//! decisions and a summary, and writes the results back.
//!
//! Transport-specific pieces live in sibling crates: the HTTP document store
//! and API extractor in `minutes-notion`, the headless browser extractor in
//! `minutes-browser`.

pub mod analyst;
pub mod config;
pub mod coordinator;
pub mod errors;
pub mod extract;
pub mod markers;
pub mod pipeline;
pub mod prompts;
pub mod providers;
pub mod retry;
pub mod store;
pub mod types;
pub mod writer;

pub use analyst::Analyst;
pub use coordinator::{Coordinator, CoordinatorSettings, CycleReport, DocumentOutcome};
pub use errors::{ExtractError, PipelineError, PromptError, StoreError};
pub use extract::{ContentExtractor, HybridExtractor};
pub use pipeline::{Pipeline, PipelineOutcome};
pub use retry::{retry_with_backoff, RetryError, RetryPolicy};
pub use store::DocumentStore;
pub use writer::Writer;
