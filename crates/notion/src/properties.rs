//! Page property payloads: reading documents, writing status, building records.

use chrono::{DateTime, Utc};
use minutes::config::{StatusKind, StatusProperty, TaskProperties};
use minutes::types::{NewRecord, PageStatus, TargetDocument};
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::blocks::{plain_text, rich_text};

/// The database query filter selecting pages in `status`.
pub fn status_filter(property: &StatusProperty, status: PageStatus) -> Value {
    let mut filter = Map::new();
    filter.insert("property".to_string(), json!(property.name));
    filter.insert(
        kind_key(property.kind).to_string(),
        json!({ "equals": status.as_str() }),
    );
    Value::Object(filter)
}

/// The `properties` payload that sets a page's status.
pub fn status_update(property: &StatusProperty, status: PageStatus) -> Value {
    let mut properties = Map::new();
    properties.insert(
        property.name.clone(),
        single_entry(kind_key(property.kind), json!({ "name": status.as_str() })),
    );
    json!({ "properties": properties })
}

fn single_entry(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn kind_key(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Status => "status",
        StatusKind::Select => "select",
    }
}

/// Reads a page object into a [`TargetDocument`].
pub fn parse_document(page: &Value, status_property: &str) -> Option<TargetDocument> {
    let id = page.get("id")?.as_str()?.to_string();
    let properties = page.get("properties").and_then(Value::as_object);

    let title = properties
        .and_then(|props| {
            props
                .values()
                .find(|p| p.get("type").and_then(Value::as_str) == Some("title"))
        })
        .map(|p| plain_text(p.get("title").unwrap_or(&Value::Null)))
        .unwrap_or_default();

    let status = properties
        .and_then(|props| props.get(status_property))
        .and_then(status_name)
        .and_then(|name| match name.parse::<PageStatus>() {
            Ok(status) => Some(status),
            Err(e) => {
                warn!("Page {id} has an unrecognized status: {e}");
                None
            }
        });

    let last_edited = page
        .get("last_edited_time")
        .and_then(Value::as_str)
        .and_then(|t| t.parse::<DateTime<Utc>>().ok());

    Some(TargetDocument {
        url: page
            .get("url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        id,
        title,
        status,
        last_edited,
    })
}

fn status_name(property: &Value) -> Option<&str> {
    ["status", "select"]
        .iter()
        .find_map(|key| property.get(*key)?.get("name")?.as_str())
}

/// The public URL of a page, used to link records back to their source.
pub fn page_url(web_base_url: &str, page_id: &str) -> String {
    format!(
        "{}/{}",
        web_base_url.trim_end_matches('/'),
        page_id.replace('-', "")
    )
}

/// The `properties` object of a new destination record.
pub fn record_properties(record: &NewRecord, names: &TaskProperties, source_url: &str) -> Value {
    let mut properties = Map::new();
    properties.insert(names.title.clone(), json!({ "title": rich_text(&record.title) }));

    if let Some(assignee) = &record.assignee {
        properties.insert(names.assignee.clone(), json!({ "rich_text": rich_text(assignee) }));
    }
    if let Some(due) = &record.due_date {
        properties.insert(names.due_date.clone(), json!({ "date": { "start": due } }));
    }
    if let Some(priority) = record.priority {
        properties.insert(
            names.priority.clone(),
            json!({ "select": { "name": priority.as_str() } }),
        );
    }
    properties.insert(
        names.source.clone(),
        json!({
            "rich_text": [{
                "type": "text",
                "text": { "content": "Meeting notes", "link": { "url": source_url } }
            }]
        }),
    );

    Value::Object(properties)
}
