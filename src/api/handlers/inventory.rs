use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::api::models::{ClaimLotRequest, CreateLotRequest, PageQuery, UpdateLotRequest};
use crate::api::state::AppState;
use crate::error::{Result, ServiceError};
use crate::models::{CategorizedLots, InventoryLot};
use crate::repository::InventoryRepository;

#[utoipa::path(
    get,
    path = "/api/v1/lots",
    params(PageQuery),
    responses(
        (status = 200, description = "Lots partitioned into current, personal, and expired", body = CategorizedLots),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_lots(
    Query(query): Query<PageQuery>,
    State(state): State<AppState>,
) -> Result<Json<CategorizedLots>> {
    query
        .validate()
        .map_err(|e| ServiceError::invalid_input("query", e.to_string()))?;

    let repo = InventoryRepository::new(state.pool);
    let lots = repo.list_categorized(&query).await?;

    Ok(Json(lots))
}

#[utoipa::path(
    post,
    path = "/api/v1/lots",
    request_body = CreateLotRequest,
    responses(
        (status = 201, description = "Lot created", body = InventoryLot),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn create_lot(
    State(state): State<AppState>,
    Json(req): Json<CreateLotRequest>,
) -> Result<(StatusCode, Json<InventoryLot>)> {
    req.validate()
        .map_err(|e| ServiceError::invalid_input("body", e.to_string()))?;

    let repo = InventoryRepository::new(state.pool);
    let lot = repo.create(req).await?;

    Ok((StatusCode::CREATED, Json(lot)))
}

#[utoipa::path(
    put,
    path = "/api/v1/lots/{id}",
    params(
        ("id" = i64, Path, description = "Lot ID")
    ),
    request_body = UpdateLotRequest,
    responses(
        (status = 200, description = "Lot updated", body = InventoryLot),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Lot not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn update_lot(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(req): Json<UpdateLotRequest>,
) -> Result<Json<InventoryLot>> {
    req.validate()
        .map_err(|e| ServiceError::invalid_input("body", e.to_string()))?;

    let repo = InventoryRepository::new(state.pool);
    let lot = repo.update(id, req).await?;

    Ok(Json(lot))
}

#[utoipa::path(
    post,
    path = "/api/v1/lots/{id}/claim",
    params(
        ("id" = i64, Path, description = "Lot ID")
    ),
    request_body = ClaimLotRequest,
    responses(
        (status = 200, description = "Lot claimed", body = InventoryLot),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Lot not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn claim_lot(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(req): Json<ClaimLotRequest>,
) -> Result<Json<InventoryLot>> {
    req.validate()
        .map_err(|e| ServiceError::invalid_input("body", e.to_string()))?;

    let repo = InventoryRepository::new(state.pool);
    let lot = repo.claim(id, &req.crew_id).await?;

    Ok(Json(lot))
}
