use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::api::models::{AskRequest, AskResponse};
use crate::api::state::AppState;
use crate::error::{Result, ServiceError};
use crate::repository::{InventoryRepository, SupplyRepository};

#[utoipa::path(
    post,
    path = "/api/v1/assistant/ask",
    request_body = AskRequest,
    responses(
        (status = 200, description = "Assistant answer", body = AskResponse),
        (status = 400, description = "Missing or malformed question"),
        (status = 502, description = "Language model unavailable"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state, payload))]
pub async fn ask(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>> {
    // A body that fails to parse is the caller's fault, not ours.
    let Json(req) = payload.map_err(|e| ServiceError::invalid_input("body", e.body_text()))?;

    let question = req
        .question
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ServiceError::invalid_input("question", "question must not be empty"))?;

    let supplies = SupplyRepository::new(state.pool.clone());
    let lots = InventoryRepository::new(state.pool.clone());

    let message = state.assistant.answer(&supplies, &lots, question).await?;

    Ok(Json(AskResponse { message }))
}
