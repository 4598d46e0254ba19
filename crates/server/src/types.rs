use minutes::{coordinator::DocumentOutcome, types::ExtractionMethod};
use serde::Serialize;
use serde_json::Value;

/// Response body for `POST /pages/{id}/process`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessResponse {
    /// `done`, `failed` or `skipped`.
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<ExtractionMethod>,
    pub created_record_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<DocumentOutcome> for ProcessResponse {
    fn from(outcome: DocumentOutcome) -> Self {
        match outcome {
            DocumentOutcome::Done(outcome) => Self {
                status: "done",
                method: Some(outcome.method),
                created_record_ids: outcome.created_record_ids,
                error: None,
            },
            DocumentOutcome::Failed { error } => Self {
                status: "failed",
                method: None,
                created_record_ids: Vec::new(),
                error: Some(error),
            },
            DocumentOutcome::Skipped { reason } => Self {
                status: "skipped",
                method: None,
                created_record_ids: Vec::new(),
                error: Some(reason),
            },
        }
    }
}

/// Finds the page a service event refers to.
///
/// Only `"object": "event"` payloads are considered. The first `page` entry
/// wins: its own id, or else its parent's `page_id` / `database_id`.
pub fn page_id_from_event(event: &Value) -> Option<String> {
    if event.get("object").and_then(Value::as_str) != Some("event") {
        return None;
    }

    event
        .get("entry")?
        .as_array()?
        .iter()
        .filter(|entry| entry.get("object").and_then(Value::as_str) == Some("page"))
        .find_map(|entry| {
            let own = non_empty(entry.get("id"));
            let parent = entry.get("parent").and_then(|parent| {
                non_empty(parent.get("page_id")).or_else(|| non_empty(parent.get("database_id")))
            });
            own.or(parent).map(str::to_string)
        })
}

fn non_empty(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|id| !id.is_empty())
}
