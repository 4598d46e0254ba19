use super::{
    errors::AppError,
    state::AppState,
    types::{page_id_from_event, ProcessResponse},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use minutes::{coordinator::DocumentOutcome, types::ExtractionResult};
use serde_json::{json, Value};
use tracing::{error, info, warn};

/// The root handler.
pub async fn root() -> &'static str {
    "minutes server is running."
}

/// The health check handler.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Runs one document through the full state machine and waits for the result.
pub async fn process_handler(
    State(app_state): State<AppState>,
    Path(page_id): Path<String>,
) -> Result<(StatusCode, Json<ProcessResponse>), AppError> {
    info!("Received process request for page: {page_id}");

    let outcome = app_state.coordinator.process_by_id(&page_id).await?;
    let status = match &outcome {
        DocumentOutcome::Done(_) => StatusCode::OK,
        DocumentOutcome::Skipped { .. } => StatusCode::CONFLICT,
        DocumentOutcome::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };

    Ok((status, Json(outcome.into())))
}

/// Hybrid extraction only. Nothing is written back.
pub async fn extract_handler(
    State(app_state): State<AppState>,
    Path(page_id): Path<String>,
) -> (StatusCode, Json<ExtractionResult>) {
    info!("Received extract request for page: {page_id}");

    let result = app_state
        .coordinator
        .pipeline()
        .extractor()
        .extract(&page_id)
        .await;
    let status = if result.success {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(result))
}

/// Accepts a service event and processes the referenced page in the background.
pub async fn webhook_handler(
    State(app_state): State<AppState>,
    Json(event): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let Some(page_id) = page_id_from_event(&event) else {
        warn!("Webhook event carries no page id, ignoring");
        // A 200 keeps the sender from redelivering.
        return (
            StatusCode::OK,
            Json(json!({
                "status": "ignored",
                "message": "event does not reference a page",
            })),
        );
    };

    info!("Webhook accepted for page: {page_id}");
    let coordinator = app_state.coordinator.clone();
    let id = page_id.clone();
    tokio::spawn(async move {
        match coordinator.process_by_id(&id).await {
            Ok(DocumentOutcome::Done(outcome)) => info!(
                "Webhook processing of {id} done: {} record(s)",
                outcome.created_record_ids.len()
            ),
            Ok(DocumentOutcome::Skipped { reason }) => info!("Webhook page {id} skipped: {reason}"),
            Ok(DocumentOutcome::Failed { error }) => {
                error!("Webhook processing of {id} failed: {error}")
            }
            Err(e) => error!("Webhook page {id} could not be loaded: {e}"),
        }
    });

    (
        StatusCode::ACCEPTED,
        Json(json!({ "status": "accepted", "pageId": page_id })),
    )
}
