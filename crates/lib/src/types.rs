//! # Data Model
//!
//! The values that flow between the pipeline stages: the documents the
//! coordinator discovers, the raw extraction result, the structured meeting
//! data produced by the model, and the write-back outcome.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The values of the status property that drives the processing state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageStatus {
    #[serde(rename = "Ready to Process")]
    Ready,
    #[serde(rename = "Processing")]
    Processing,
    #[serde(rename = "Done")]
    Done,
    #[serde(rename = "Error")]
    Error,
}

impl PageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageStatus::Ready => "Ready to Process",
            PageStatus::Processing => "Processing",
            PageStatus::Done => "Done",
            PageStatus::Error => "Error",
        }
    }

    /// `Done` and `Error` are never left by this subsystem.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PageStatus::Done | PageStatus::Error)
    }
}

impl fmt::Display for PageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Ready to Process" => Ok(PageStatus::Ready),
            "Processing" => Ok(PageStatus::Processing),
            "Done" => Ok(PageStatus::Done),
            "Error" => Ok(PageStatus::Error),
            other => Err(format!("unknown status value '{other}'")),
        }
    }
}

/// A candidate document discovered by a poll query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetDocument {
    pub id: String,
    pub url: String,
    pub title: String,
    pub status: Option<PageStatus>,
    #[serde(default)]
    pub last_edited: Option<DateTime<Utc>>,
}

/// Which tier of the hybrid strategy produced the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    Api,
    Browser,
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionMethod::Api => f.write_str("api"),
            ExtractionMethod::Browser => f.write_str("browser"),
        }
    }
}

/// Raw text pulled from a document by one extractor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedContent {
    pub text: String,
    /// Whether a target-section marker was found and `text` is that section.
    pub marker_found: bool,
}

/// The outcome of one hybrid extraction attempt. Transient, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<ExtractionMethod>,
}

impl ExtractionResult {
    pub fn success(content: String, method: ExtractionMethod) -> Self {
        Self {
            success: true,
            content: Some(content),
            error: None,
            method: Some(method),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            error: Some(error.into()),
            method: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Case-insensitive parse; anything else is treated as absent.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "high" => Some(Priority::High),
            "medium" => Some(Priority::Medium),
            "low" => Some(Priority::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyDecision {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Normalized model output. The arrays are never absent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredMeetingData {
    pub action_items: Vec<ActionItem>,
    pub key_decisions: Vec<KeyDecision>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// The outcome of one structured-extraction call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalystResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<StructuredMeetingData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// The model's raw output, kept on parse failures for a manual re-run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl AnalystResult {
    pub fn success(data: StructuredMeetingData) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            raw: None,
        }
    }

    pub fn failure(error: impl Into<String>, raw: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            raw,
        }
    }
}

/// One record to create in the destination collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub title: String,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub due_date: Option<String>,
    pub priority: Option<Priority>,
    /// The document the record was extracted from.
    pub source_document_id: String,
}

/// A block appended to the source document after write-back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationBlock {
    Divider,
    Heading(String),
    Paragraph(String),
    Bullet(String),
    Callout { icon: String, text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteBackResult {
    pub success: bool,
    pub created_record_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
