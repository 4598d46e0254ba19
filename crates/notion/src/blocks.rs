//! Conversions between Notion block JSON and plain text.

use minutes::types::AnnotationBlock;
use serde_json::{json, Value};

/// Notion rejects rich-text items longer than this.
const MAX_RICH_TEXT_CHARS: usize = 2000;

/// Concatenates the `plain_text` of a rich-text array.
pub fn plain_text(rich_text: &Value) -> String {
    rich_text
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.get("plain_text").and_then(Value::as_str))
                .collect::<String>()
        })
        .unwrap_or_default()
}

/// Renders one block as text. Returns `None` for blocks without text.
pub fn block_text(block: &Value) -> Option<String> {
    let kind = block.get("type").and_then(Value::as_str)?;
    let body = block.get(kind).unwrap_or(&Value::Null);
    let rich = plain_text(body.get("rich_text").unwrap_or(&Value::Null));

    let text = match kind {
        "paragraph" | "toggle" | "callout" | "code" => rich,
        "heading_1" => prefixed("# ", rich),
        "heading_2" => prefixed("## ", rich),
        "heading_3" => prefixed("### ", rich),
        "bulleted_list_item" => prefixed("* ", rich),
        "numbered_list_item" => prefixed("1. ", rich),
        "quote" => prefixed("> ", rich),
        "to_do" => {
            let checked = body.get("checked").and_then(Value::as_bool).unwrap_or(false);
            prefixed(if checked { "[x] " } else { "[ ] " }, rich)
        }
        "child_page" => body
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => {
            let mut fragments = Vec::new();
            scan_text(body, &mut fragments);
            fragments.join(" ")
        }
    };

    let text = text.trim_end().to_string();
    (!text.trim().is_empty()).then_some(text)
}

fn prefixed(prefix: &str, text: String) -> String {
    if text.trim().is_empty() {
        text
    } else {
        format!("{prefix}{text}")
    }
}

/// Best-effort scan of an untyped block body for text fragments.
fn scan_text(value: &Value, fragments: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(text) = map.get("plain_text").and_then(Value::as_str) {
                push_fragment(text, fragments);
                return;
            }
            for (key, child) in map {
                match (key.as_str(), child) {
                    ("content" | "title", Value::String(text)) => push_fragment(text, fragments),
                    _ => scan_text(child, fragments),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| scan_text(item, fragments)),
        _ => {}
    }
}

fn push_fragment(text: &str, fragments: &mut Vec<String>) {
    let text = text.trim();
    if !text.is_empty() {
        fragments.push(text.to_string());
    }
}

/// Builds a rich-text array, splitting long text into API-sized chunks.
pub fn rich_text(text: &str) -> Value {
    let chars: Vec<char> = text.chars().collect();
    let items: Vec<Value> = chars
        .chunks(MAX_RICH_TEXT_CHARS)
        .map(|chunk| {
            json!({
                "type": "text",
                "text": { "content": chunk.iter().collect::<String>() }
            })
        })
        .collect();
    Value::Array(items)
}

pub fn paragraph(text: &str) -> Value {
    json!({
        "object": "block",
        "type": "paragraph",
        "paragraph": { "rich_text": rich_text(text) }
    })
}

pub fn to_block(block: &AnnotationBlock) -> Value {
    match block {
        AnnotationBlock::Divider => json!({
            "object": "block",
            "type": "divider",
            "divider": {}
        }),
        AnnotationBlock::Heading(text) => json!({
            "object": "block",
            "type": "heading_2",
            "heading_2": { "rich_text": rich_text(text) }
        }),
        AnnotationBlock::Paragraph(text) => paragraph(text),
        AnnotationBlock::Bullet(text) => json!({
            "object": "block",
            "type": "bulleted_list_item",
            "bulleted_list_item": { "rich_text": rich_text(text) }
        }),
        AnnotationBlock::Callout { icon, text } => json!({
            "object": "block",
            "type": "callout",
            "callout": {
                "rich_text": rich_text(text),
                "icon": { "type": "emoji", "emoji": icon }
            }
        }),
    }
}
