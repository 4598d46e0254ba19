//! # Structured Extraction Agent
//!
//! Sends raw meeting text to the language model under a strict JSON contract,
//! then parses and normalizes the answer into [`StructuredMeetingData`].
//!
//! Malformed output is never coerced into an empty result: a parse failure is
//! reported with the parser's message and the raw output is kept for a manual
//! re-run.

use crate::{
    prompts::analyst::{ANALYST_SYSTEM_PROMPT, ANALYST_USER_PROMPT},
    providers::ai::{AiProvider, GenerationOptions},
    types::{ActionItem, AnalystResult, KeyDecision, Priority, StructuredMeetingData},
};
use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static CODE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```(?:json)?\s*(.*?)\s*```\s*$").expect("code fence pattern is valid")
});

pub struct Analyst {
    provider: Box<dyn AiProvider>,
    options: GenerationOptions,
}

impl Analyst {
    pub fn new(provider: Box<dyn AiProvider>) -> Self {
        Self {
            provider,
            options: GenerationOptions {
                temperature: 0.1,
                json_mode: true,
                max_tokens: None,
            },
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = temperature;
        self
    }

    /// Runs the structured extraction. Never returns an error: every failure is
    /// folded into a failed [`AnalystResult`].
    pub async fn analyze(&self, raw_text: &str) -> AnalystResult {
        let user_prompt = ANALYST_USER_PROMPT.replace("{raw_text}", raw_text);
        debug!(chars = raw_text.len(), "--> Sending meeting text to AI provider");

        let raw = match self
            .provider
            .generate(ANALYST_SYSTEM_PROMPT, &user_prompt, &self.options)
            .await
        {
            Ok(Some(raw)) => raw,
            Ok(None) => return AnalystResult::failure("no content returned", None),
            Err(e) => return AnalystResult::failure(format!("model request failed: {e}"), None),
        };

        match parse_structured(&raw) {
            Ok(data) => {
                info!(
                    "Structured extraction produced {} action item(s) and {} decision(s)",
                    data.action_items.len(),
                    data.key_decisions.len()
                );
                AnalystResult::success(data)
            }
            Err(e) => {
                warn!("Model output is not valid JSON ({e}). Raw output: {raw}");
                AnalystResult::failure(format!("failed to parse model output as JSON: {e}"), Some(raw))
            }
        }
    }
}

/// Parses model output (optionally wrapped in a markdown code fence) and
/// normalizes it.
pub fn parse_structured(raw: &str) -> Result<StructuredMeetingData, serde_json::Error> {
    let body = CODE_FENCE_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw);
    let value: Value = serde_json::from_str(body)?;
    Ok(normalize(&value))
}

/// Maps arbitrary JSON into the canonical shape.
///
/// Array fields that are missing or not arrays become empty. Every array element
/// is kept; a missing `title` becomes the empty string. Feeding the serialized
/// output back through this function yields the same value.
pub fn normalize(value: &Value) -> StructuredMeetingData {
    let empty = Map::new();
    let root = value.as_object().unwrap_or(&empty);

    let action_items = array_field(root, "actionItems")
        .iter()
        .map(normalize_action_item)
        .collect();
    let key_decisions = array_field(root, "keyDecisions")
        .iter()
        .map(normalize_decision)
        .collect();
    let summary = root
        .get("summary")
        .and_then(Value::as_str)
        .map(str::to_string);

    StructuredMeetingData {
        action_items,
        key_decisions,
        summary,
    }
}

fn array_field<'a>(root: &'a Map<String, Value>, key: &str) -> &'a [Value] {
    root.get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn normalize_action_item(value: &Value) -> ActionItem {
    let Some(obj) = value.as_object() else {
        return ActionItem {
            title: value.as_str().unwrap_or_default().to_string(),
            ..Default::default()
        };
    };

    ActionItem {
        title: title_of(obj, &["title", "text", "task"]),
        description: text_field(obj, "description"),
        assignee: text_field(obj, "assignee"),
        due_date: text_field(obj, "dueDate").and_then(|d| normalize_date(&d)),
        priority: text_field(obj, "priority").and_then(|p| Priority::parse(&p)),
    }
}

fn normalize_decision(value: &Value) -> KeyDecision {
    let Some(obj) = value.as_object() else {
        return KeyDecision {
            title: value.as_str().unwrap_or_default().to_string(),
            ..Default::default()
        };
    };

    KeyDecision {
        title: title_of(obj, &["title", "decision"]),
        description: text_field(obj, "description"),
        context: text_field(obj, "context"),
    }
}

fn title_of(obj: &Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string()
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time part.
fn normalize_date(raw: &str) -> Option<String> {
    let candidate = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(candidate, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}
