use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::api::models::{CreateLogRequest, ListLogsResponse, PageQuery, Pagination};
use crate::api::state::AppState;
use crate::error::{Result, ServiceError};
use crate::models::LogEntry;
use crate::repository::LogRepository;

#[utoipa::path(
    get,
    path = "/api/v1/logs",
    params(PageQuery),
    responses(
        (status = 200, description = "List of usage log entries", body = ListLogsResponse),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_logs(
    Query(query): Query<PageQuery>,
    State(state): State<AppState>,
) -> Result<Json<ListLogsResponse>> {
    query
        .validate()
        .map_err(|e| ServiceError::invalid_input("query", e.to_string()))?;

    let repo = LogRepository::new(state.pool);

    let logs = repo.list(&query).await?;
    let total = repo.count().await?;

    let pagination = Pagination::new(query.page(), query.page_size(), total);

    Ok(Json(ListLogsResponse {
        data: logs,
        pagination,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/logs",
    request_body = CreateLogRequest,
    responses(
        (status = 201, description = "Log entry created", body = LogEntry),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn create_log(
    State(state): State<AppState>,
    Json(req): Json<CreateLogRequest>,
) -> Result<(StatusCode, Json<LogEntry>)> {
    req.validate()
        .map_err(|e| ServiceError::invalid_input("body", e.to_string()))?;

    let repo = LogRepository::new(state.pool);
    let entry = repo.create(req).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/logs/{id}",
    params(
        ("id" = i64, Path, description = "Log entry ID")
    ),
    responses(
        (status = 204, description = "Log entry deleted"),
        (status = 404, description = "Log entry not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_log(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    let repo = LogRepository::new(state.pool);
    repo.soft_delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
