//! DMAT account handlers.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{CreateDmatAccount, DmatAccount, UpdateDmatAccount};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginatedDmatAccounts, PaginationParams, SuccessResponse};

/// Create DMAT account routes
pub fn dmat_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_accounts).post(create_account))
        .route(
            "/:id",
            get(get_account).put(update_account).delete(delete_account),
        )
}

/// List DMAT accounts, newest first
#[utoipa::path(
    get,
    path = "/dmat-accounts",
    tag = "DMAT Accounts",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "One page of accounts", body = PaginatedDmatAccounts),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<DmatAccount>>> {
    Ok(Json(state.dmat_service.list(pagination).await?))
}

#[utoipa::path(
    get,
    path = "/dmat-accounts/{id}",
    tag = "DMAT Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Account", body = DmatAccount),
        (status = 404, description = "Account not found")
    )
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DmatAccount>> {
    Ok(Json(state.dmat_service.get(id).await?))
}

/// Create an account (employee or admin)
#[utoipa::path(
    post,
    path = "/dmat-accounts",
    tag = "DMAT Accounts",
    security(("bearer_auth" = [])),
    request_body = CreateDmatAccount,
    responses(
        (status = 201, description = "Account created", body = DmatAccount),
        (status = 400, description = "Validation error or duplicate account number"),
        (status = 403, description = "Staff only")
    )
)]
pub async fn create_account(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateDmatAccount>,
) -> AppResult<(StatusCode, Json<DmatAccount>)> {
    let account = state.dmat_service.create(&current, payload).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// Update an account (employee or admin)
#[utoipa::path(
    put,
    path = "/dmat-accounts/{id}",
    tag = "DMAT Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    request_body = UpdateDmatAccount,
    responses(
        (status = 200, description = "Account updated", body = DmatAccount),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn update_account(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<UpdateDmatAccount>,
) -> AppResult<Json<DmatAccount>> {
    Ok(Json(state.dmat_service.update(&current, id, payload).await?))
}

/// Delete an account (employee or admin)
#[utoipa::path(
    delete,
    path = "/dmat-accounts/{id}",
    tag = "DMAT Accounts",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Account ID")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Account not found")
    )
)]
pub async fn delete_account(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse>> {
    state.dmat_service.delete(&current, id).await?;
    Ok(Json(SuccessResponse::ok()))
}
