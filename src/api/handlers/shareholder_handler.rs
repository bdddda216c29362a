//! Legacy shareholder handlers over the JSON file store.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::extractors::RawJson;
use crate::api::AppState;
use crate::domain::Shareholder;
use crate::errors::AppResult;
use crate::types::{Paginated, PaginationParams, SuccessResponse};

/// Create shareholder routes
pub fn shareholder_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_shareholders).post(create_shareholder))
        .route(
            "/:id",
            get(get_shareholder)
                .put(update_shareholder)
                .delete(delete_shareholder),
        )
}

/// List shareholders in file order, ten per page by default
#[utoipa::path(
    get,
    path = "/shareholders",
    tag = "Shareholders",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "`{data, page, limit, total}`", body = Object),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_shareholders(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<Shareholder>>> {
    Ok(Json(state.shareholder_service.list(pagination).await?))
}

#[utoipa::path(
    get,
    path = "/shareholders/{id}",
    tag = "Shareholders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Shareholder ID")),
    responses(
        (status = 200, description = "Shareholder record", body = Object),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_shareholder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Shareholder>> {
    Ok(Json(state.shareholder_service.get(id).await?))
}

/// Create a record from any JSON object
#[utoipa::path(
    post,
    path = "/shareholders",
    tag = "Shareholders",
    security(("bearer_auth" = [])),
    request_body = Object,
    responses(
        (status = 201, description = "Created", body = Object),
        (status = 400, description = "Body is not a JSON object")
    )
)]
pub async fn create_shareholder(
    State(state): State<AppState>,
    RawJson(body): RawJson,
) -> AppResult<(StatusCode, Json<Shareholder>)> {
    let created = state.shareholder_service.create(body).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Shallow-merge fields into a record
#[utoipa::path(
    put,
    path = "/shareholders/{id}",
    tag = "Shareholders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Shareholder ID")),
    request_body = Object,
    responses(
        (status = 200, description = "Updated", body = Object),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_shareholder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    RawJson(body): RawJson,
) -> AppResult<Json<Shareholder>> {
    Ok(Json(
        state
            .shareholder_service
            .update(id, body)
            .await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/shareholders/{id}",
    tag = "Shareholders",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Shareholder ID")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_shareholder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse>> {
    state.shareholder_service.delete(id).await?;
    Ok(Json(SuccessResponse::ok()))
}
