use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::api::models::{
    CreateCrewRequest, ListCrewResponse, PageQuery, Pagination, UpdateCrewRequest,
};
use crate::api::state::AppState;
use crate::error::{Result, ServiceError};
use crate::models::CrewMember;
use crate::repository::CrewRepository;

#[utoipa::path(
    get,
    path = "/api/v1/crew",
    params(PageQuery),
    responses(
        (status = 200, description = "List of crew members", body = ListCrewResponse),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_crew(
    Query(query): Query<PageQuery>,
    State(state): State<AppState>,
) -> Result<Json<ListCrewResponse>> {
    query
        .validate()
        .map_err(|e| ServiceError::invalid_input("query", e.to_string()))?;

    let repo = CrewRepository::new(state.pool);

    let crew = repo.list(&query).await?;
    let total = repo.count(&query).await?;

    let pagination = Pagination::new(query.page(), query.page_size(), total);

    Ok(Json(ListCrewResponse {
        data: crew,
        pagination,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/crew",
    request_body = CreateCrewRequest,
    responses(
        (status = 201, description = "Crew member created", body = CrewMember),
        (status = 400, description = "Bad request"),
        (status = 409, description = "Conflict - crew member already exists"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn create_crew_member(
    State(state): State<AppState>,
    Json(req): Json<CreateCrewRequest>,
) -> Result<(StatusCode, Json<CrewMember>)> {
    req.validate()
        .map_err(|e| ServiceError::invalid_input("body", e.to_string()))?;

    let repo = CrewRepository::new(state.pool);
    let member = repo.create(req).await?;

    Ok((StatusCode::CREATED, Json(member)))
}

#[utoipa::path(
    get,
    path = "/api/v1/crew/{id}",
    params(
        ("id" = String, Path, description = "Crew member ID")
    ),
    responses(
        (status = 200, description = "Crew member found", body = CrewMember),
        (status = 404, description = "Crew member not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_crew_member(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<CrewMember>> {
    let repo = CrewRepository::new(state.pool);
    let member = repo.get_by_id(&id).await?;

    Ok(Json(member))
}

#[utoipa::path(
    put,
    path = "/api/v1/crew/{id}",
    params(
        ("id" = String, Path, description = "Crew member ID")
    ),
    request_body = UpdateCrewRequest,
    responses(
        (status = 200, description = "Crew member updated", body = CrewMember),
        (status = 400, description = "Bad request"),
        (status = 404, description = "Crew member not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn update_crew_member(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<UpdateCrewRequest>,
) -> Result<Json<CrewMember>> {
    req.validate()
        .map_err(|e| ServiceError::invalid_input("body", e.to_string()))?;

    let repo = CrewRepository::new(state.pool);
    let member = repo.update(&id, req).await?;

    Ok(Json(member))
}
