//! # `minutes-notion`: Notion API Integration
//!
//! The document store (status queries and writes, task creation, block append)
//! and the API Extraction Agent, both over the Notion REST API.

pub mod blocks;
pub mod client;
pub mod errors;
pub mod extractor;
pub mod properties;
pub mod store;

pub use client::NotionClient;
pub use errors::NotionError;
pub use extractor::ApiExtractor;
pub use store::{NotionStore, StoreSettings};
