//! Client profile handlers, including the holding commands.

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{
    CreatedProfile, EditHoldingRequest, HoldingKeyQuery, HoldingPayload, ProfilePayload,
    ProfileResponse, SetReviewRequest,
};
use crate::errors::AppResult;
use crate::types::{Paginated, PaginatedProfiles, PaginationParams, SuccessResponse};

/// Free-text search over name, PAN and company names
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProfileSearch {
    #[param(example = "ABCDE")]
    pub q: Option<String>,
}

/// Create client profile routes
pub fn client_profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_profiles).post(create_profile))
        .route(
            "/:id",
            get(get_profile).put(update_profile).delete(delete_profile),
        )
        .route(
            "/:id/holdings",
            post(add_holding).put(edit_holding).delete(remove_holding),
        )
        .route("/:id/holdings/review", put(set_review))
}

/// List profiles visible to the caller
#[utoipa::path(
    get,
    path = "/client-profiles",
    tag = "Client Profiles",
    security(("bearer_auth" = [])),
    params(ProfileSearch, PaginationParams),
    responses(
        (status = 200, description = "Matching profiles, newest first", body = PaginatedProfiles),
        (status = 401, description = "Unauthorized"),
        (status = 503, description = "Database not connected")
    )
)]
pub async fn list_profiles(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(search): Query<ProfileSearch>,
    Query(pagination): Query<PaginationParams>,
) -> AppResult<Json<Paginated<ProfileResponse>>> {
    let page = state
        .profile_service
        .list(&current, search.q, pagination)
        .await?;
    Ok(Json(page))
}

/// Get one profile
#[utoipa::path(
    get,
    path = "/client-profiles/{id}",
    tag = "Client Profiles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 403, description = "Not allowed to view this profile"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn get_profile(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProfileResponse>> {
    Ok(Json(state.profile_service.get(&current, id).await?))
}

/// Create a profile and provision the owner's login (admin only)
#[utoipa::path(
    post,
    path = "/client-profiles",
    tag = "Client Profiles",
    security(("bearer_auth" = [])),
    request_body = ProfilePayload,
    responses(
        (status = 201, description = "Profile created; credentials present when a login was generated", body = CreatedProfile),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin only")
    )
)]
pub async fn create_profile(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProfilePayload>,
) -> AppResult<(StatusCode, Json<CreatedProfile>)> {
    let created = state.profile_service.create(&current, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a profile's mutable fields
#[utoipa::path(
    put,
    path = "/client-profiles/{id}",
    tag = "Client Profiles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = ProfilePayload,
    responses(
        (status = 200, description = "Updated profile", body = ProfileResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not allowed to edit this profile"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn update_profile(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<ProfilePayload>,
) -> AppResult<Json<ProfileResponse>> {
    Ok(Json(
        state.profile_service.update(&current, id, payload).await?,
    ))
}

/// Delete a profile
#[utoipa::path(
    delete,
    path = "/client-profiles/{id}",
    tag = "Client Profiles",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    responses(
        (status = 200, description = "Deleted", body = SuccessResponse),
        (status = 403, description = "Not allowed to delete this profile"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn delete_profile(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<SuccessResponse>> {
    state.profile_service.delete(&current, id).await?;
    Ok(Json(SuccessResponse::ok()))
}

/// Add a holding
#[utoipa::path(
    post,
    path = "/client-profiles/{id}/holdings",
    tag = "Holdings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = HoldingPayload,
    responses(
        (status = 201, description = "Holding added", body = ProfileResponse),
        (status = 400, description = "Missing company name or duplicate holding"),
        (status = 404, description = "Profile not found")
    )
)]
pub async fn add_holding(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<HoldingPayload>,
) -> AppResult<(StatusCode, Json<ProfileResponse>)> {
    let profile = state
        .profile_service
        .add_holding(&current, id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Edit the holding identified by company name and ISIN
#[utoipa::path(
    put,
    path = "/client-profiles/{id}/holdings",
    tag = "Holdings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = EditHoldingRequest,
    responses(
        (status = 200, description = "Holding updated", body = ProfileResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Profile or holding not found")
    )
)]
pub async fn edit_holding(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<EditHoldingRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .profile_service
        .edit_holding(&current, id, payload.key, payload.holding)
        .await?;
    Ok(Json(profile))
}

/// Remove a holding; the last one cannot be removed
#[utoipa::path(
    delete,
    path = "/client-profiles/{id}/holdings",
    tag = "Holdings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID"), HoldingKeyQuery),
    responses(
        (status = 200, description = "Holding removed", body = ProfileResponse),
        (status = 400, description = "Last holding"),
        (status = 404, description = "Profile or holding not found")
    )
)]
pub async fn remove_holding(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(key): Query<HoldingKeyQuery>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .profile_service
        .remove_holding(&current, id, key.into())
        .await?;
    Ok(Json(profile))
}

/// Record a review decision on a holding
#[utoipa::path(
    put,
    path = "/client-profiles/{id}/holdings/review",
    tag = "Holdings",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Profile ID")),
    request_body = SetReviewRequest,
    responses(
        (status = 200, description = "Review recorded", body = ProfileResponse),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Not allowed to review this profile"),
        (status = 404, description = "Profile or holding not found")
    )
)]
pub async fn set_review(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    ValidatedJson(payload): ValidatedJson<SetReviewRequest>,
) -> AppResult<Json<ProfileResponse>> {
    let profile = state
        .profile_service
        .set_review(&current, id, payload.key, payload.status, payload.notes)
        .await?;
    Ok(Json(profile))
}
