//! # Notion Document Store Tests
//!
//! Verifies the REST payloads the store sends against a mock Notion API.

use httpmock::{Method, MockServer};
use minutes::{
    config::{StatusKind, StatusProperty, TaskProperties},
    errors::StoreError,
    store::DocumentStore,
    types::{AnnotationBlock, NewRecord, PageStatus, Priority},
};
use minutes_notion::{NotionClient, NotionStore, StoreSettings};
use serde_json::json;

fn store(server: &MockServer, kind: StatusKind) -> NotionStore {
    let client = NotionClient::new("secret_test", "2022-06-28", &server.base_url()).unwrap();
    NotionStore::new(
        client,
        StoreSettings {
            source_collection_id: "src-db".to_string(),
            destination_collection_id: "dst-db".to_string(),
            status_property: StatusProperty {
                name: "Status".to_string(),
                kind,
            },
            task_properties: TaskProperties::default(),
            web_base_url: "https://www.notion.so".to_string(),
        },
    )
}

fn page(id: &str, title: &str, status: &str) -> serde_json::Value {
    json!({
        "object": "page",
        "id": id,
        "url": format!("https://www.notion.so/{id}"),
        "last_edited_time": "2024-08-01T10:00:00.000Z",
        "properties": {
            "Name": {"id": "title", "type": "title", "title": [{"plain_text": title}]},
            "Status": {"id": "s", "type": "status", "status": {"name": status}}
        }
    })
}

#[tokio::test]
async fn test_query_by_status_follows_pagination() -> anyhow::Result<()> {
    // --- 1. Arrange ---
    let server = MockServer::start_async().await;
    let first_page = server
        .mock_async(|when, then| {
            when.method(Method::POST)
                .path("/v1/databases/src-db/query")
                .header("Authorization", "Bearer secret_test")
                .header("Notion-Version", "2022-06-28")
                .json_body(json!({
                    "filter": {"property": "Status", "status": {"equals": "Ready to Process"}},
                    "page_size": 100
                }));
            then.status(200).json_body(json!({
                "results": [page("p1", "Weekly sync", "Ready to Process")],
                "has_more": true,
                "next_cursor": "cursor-2"
            }));
        })
        .await;
    let second_page = server
        .mock_async(|when, then| {
            when.method(Method::POST)
                .path("/v1/databases/src-db/query")
                .json_body_partial(r#"{"start_cursor": "cursor-2"}"#);
            then.status(200).json_body(json!({
                "results": [page("p2", "Planning", "Ready to Process")],
                "has_more": false,
                "next_cursor": null
            }));
        })
        .await;

    // --- 2. Act ---
    let documents = store(&server, StatusKind::Status)
        .query_by_status(PageStatus::Ready)
        .await?;

    // --- 3. Assert ---
    first_page.assert_async().await;
    second_page.assert_async().await;
    let titles: Vec<_> = documents.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["Weekly sync", "Planning"]);
    assert_eq!(documents[0].status, Some(PageStatus::Ready));
    assert!(documents[0].last_edited.is_some());
    Ok(())
}

#[tokio::test]
async fn test_update_status_uses_select_payload_when_configured() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let patch = server
        .mock_async(|when, then| {
            when.method(Method::PATCH)
                .path("/v1/pages/p1")
                .json_body(json!({"properties": {"Status": {"select": {"name": "Processing"}}}}));
            then.status(200).json_body(page("p1", "Weekly sync", "Processing"));
        })
        .await;

    store(&server, StatusKind::Select)
        .update_status("p1", PageStatus::Processing)
        .await?;

    patch.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_get_document_maps_not_found() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(Method::GET).path("/v1/pages/missing");
            then.status(404)
                .json_body(json!({"object": "error", "code": "object_not_found"}));
        })
        .await;

    let result = store(&server, StatusKind::Status).get_document("missing").await;

    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_create_record_sends_properties_and_description() -> anyhow::Result<()> {
    // --- 1. Arrange ---
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(Method::POST).path("/v1/pages").json_body_partial(
                json!({
                    "parent": {"database_id": "dst-db"},
                    "properties": {
                        "Name": {"title": [{"type": "text", "text": {"content": "Send report"}}]},
                        "Due Date": {"date": {"start": "2024-07-01"}},
                        "Priority": {"select": {"name": "High"}},
                        "Source": {"rich_text": [{"text": {"link": {"url": "https://www.notion.so/abc123"}}}]}
                    },
                    "children": [{"type": "paragraph"}]
                })
                .to_string(),
            );
            then.status(200).json_body(json!({"object": "page", "id": "task-1"}));
        })
        .await;

    let record = NewRecord {
        title: "Send report".to_string(),
        description: Some("Include Q3 numbers".to_string()),
        assignee: Some("Dana".to_string()),
        due_date: Some("2024-07-01".to_string()),
        priority: Some(Priority::High),
        source_document_id: "abc-123".to_string(),
    };

    // --- 2. Act ---
    let id = store(&server, StatusKind::Status)
        .create_record(&record)
        .await?;

    // --- 3. Assert ---
    create.assert_async().await;
    assert_eq!(id, "task-1");
    Ok(())
}

#[tokio::test]
async fn test_append_blocks_renders_annotation() -> anyhow::Result<()> {
    let server = MockServer::start_async().await;
    let append = server
        .mock_async(|when, then| {
            when.method(Method::PATCH)
                .path("/v1/blocks/p1/children")
                .json_body_partial(
                    json!({
                        "children": [
                            {"type": "divider"},
                            {"type": "callout", "callout": {"icon": {"emoji": "📝"}}}
                        ]
                    })
                    .to_string(),
                );
            then.status(200).json_body(json!({"results": []}));
        })
        .await;

    store(&server, StatusKind::Status)
        .append_blocks(
            "p1",
            &[
                AnnotationBlock::Divider,
                AnnotationBlock::Callout {
                    icon: "📝".to_string(),
                    text: "Summary".to_string(),
                },
            ],
        )
        .await?;

    append.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_api_error_is_reported_with_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(Method::POST).path("/v1/databases/src-db/query");
            then.status(503).body("upstream unavailable");
        })
        .await;

    let result = store(&server, StatusKind::Status)
        .query_by_status(PageStatus::Ready)
        .await;

    match result {
        Err(StoreError::Api { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream unavailable");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}
