use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::api::models::{
    CreateSupplyRequest, ListSuppliesResponse, PageQuery, Pagination, UpdateSupplyRequest,
};
use crate::api::state::AppState;
use crate::error::{Result, ServiceError};
use crate::models::Supply;
use crate::repository::SupplyRepository;

#[utoipa::path(
    get,
    path = "/api/v1/supplies",
    params(PageQuery),
    responses(
        (status = 200, description = "List of supplies", body = ListSuppliesResponse),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_supplies(
    Query(query): Query<PageQuery>,
    State(state): State<AppState>,
) -> Result<Json<ListSuppliesResponse>> {
    query
        .validate()
        .map_err(|e| ServiceError::invalid_input("query", e.to_string()))?;

    let repo = SupplyRepository::new(state.pool);

    let supplies = repo.list(&query).await?;
    let total = repo.count(&query).await?;

    let pagination = Pagination::new(query.page(), query.page_size(), total);

    Ok(Json(ListSuppliesResponse {
        data: supplies,
        pagination,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/supplies",
    request_body = CreateSupplyRequest,
    responses(
        (status = 201, description = "Supply created", body = Supply),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn create_supply(
    State(state): State<AppState>,
    Json(req): Json<CreateSupplyRequest>,
) -> Result<(StatusCode, Json<Supply>)> {
    req.validate()
        .map_err(|e| ServiceError::invalid_input("body", e.to_string()))?;

    let repo = SupplyRepository::new(state.pool);
    let supply = repo.create(req).await?;

    Ok((StatusCode::CREATED, Json(supply)))
}

#[utoipa::path(
    get,
    path = "/api/v1/supplies/{id}",
    params(
        ("id" = i64, Path, description = "Supply ID")
    ),
    responses(
        (status = 200, description = "Supply found", body = Supply),
        (status = 404, description = "Supply not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_supply(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Supply>> {
    let repo = SupplyRepository::new(state.pool);
    let supply = repo.get_by_id(id).await?;

    Ok(Json(supply))
}

#[utoipa::path(
    put,
    path = "/api/v1/supplies/{id}",
    params(
        ("id" = i64, Path, description = "Supply ID")
    ),
    request_body = UpdateSupplyRequest,
    responses(
        (status = 200, description = "Supply updated", body = Supply),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Supply not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn update_supply(
    Path(id): Path<i64>,
    State(state): State<AppState>,
    Json(req): Json<UpdateSupplyRequest>,
) -> Result<Json<Supply>> {
    req.validate()
        .map_err(|e| ServiceError::invalid_input("body", e.to_string()))?;

    let repo = SupplyRepository::new(state.pool);
    let supply = repo.update(id, req).await?;

    Ok(Json(supply))
}

#[utoipa::path(
    delete,
    path = "/api/v1/supplies/{id}",
    params(
        ("id" = i64, Path, description = "Supply ID")
    ),
    responses(
        (status = 204, description = "Supply deleted"),
        (status = 404, description = "Supply not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_supply(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<StatusCode> {
    let repo = SupplyRepository::new(state.pool);
    repo.soft_delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
