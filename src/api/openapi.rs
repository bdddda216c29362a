//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    auth_handler, client_profile_handler, dmat_handler, health_handler, shareholder_handler,
    user_handler,
};
use crate::domain::{
    BankDetails, CreateDmatAccount, CreatedProfile, Credentials, DistinctiveNumber, Dividend,
    DividendPayload, DmatAccount, EditHoldingRequest, HoldingKey, HoldingPayload,
    HoldingResponse, ProfilePayload, ProfileResponse, ProfileStatus, RenewalStatus, Review,
    ReviewStatus, SetReviewRequest, ShareHolding, ShareholderName, UpdateDmatAccount, UpdateUser,
    UserResponse, UserRole,
};
use crate::services::LoginResponse;
use crate::types::{MessageResponse, PaginatedDmatAccounts, PaginatedProfiles, SuccessResponse};

/// OpenAPI documentation for the Share Registry API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Share Registry API",
        version = "0.1.0",
        description = "Client share-holding records, review workflow and account provisioning"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        health_handler::health,
        // Authentication endpoints
        auth_handler::register,
        auth_handler::login,
        auth_handler::forgot_password,
        auth_handler::reset_password,
        auth_handler::me,
        auth_handler::change_password,
        // User endpoints
        user_handler::list_users,
        user_handler::get_user,
        user_handler::update_user,
        user_handler::reset_user_password,
        user_handler::delete_user,
        // Client profiles and holdings
        client_profile_handler::list_profiles,
        client_profile_handler::get_profile,
        client_profile_handler::create_profile,
        client_profile_handler::update_profile,
        client_profile_handler::delete_profile,
        client_profile_handler::add_holding,
        client_profile_handler::edit_holding,
        client_profile_handler::remove_holding,
        client_profile_handler::set_review,
        // DMAT accounts
        dmat_handler::list_accounts,
        dmat_handler::get_account,
        dmat_handler::create_account,
        dmat_handler::update_account,
        dmat_handler::delete_account,
        // Legacy shareholder file
        shareholder_handler::list_shareholders,
        shareholder_handler::get_shareholder,
        shareholder_handler::create_shareholder,
        shareholder_handler::update_shareholder,
        shareholder_handler::delete_shareholder,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            UpdateUser,
            Credentials,
            LoginResponse,
            auth_handler::RegisterRequest,
            auth_handler::RegisterResponse,
            auth_handler::LoginRequest,
            auth_handler::ForgotPasswordRequest,
            auth_handler::ResetPasswordRequest,
            auth_handler::ChangePasswordRequest,
            auth_handler::CurrentUserResponse,
            user_handler::AdminResetPasswordRequest,
            ProfilePayload,
            HoldingPayload,
            DividendPayload,
            EditHoldingRequest,
            SetReviewRequest,
            ProfileResponse,
            HoldingResponse,
            CreatedProfile,
            ProfileStatus,
            ShareholderName,
            BankDetails,
            Dividend,
            DistinctiveNumber,
            ShareHolding,
            HoldingKey,
            Review,
            ReviewStatus,
            DmatAccount,
            CreateDmatAccount,
            UpdateDmatAccount,
            RenewalStatus,
            PaginatedProfiles,
            PaginatedDmatAccounts,
            MessageResponse,
            SuccessResponse,
            health_handler::HealthResponse,
            health_handler::ServiceHealth,
            health_handler::ServiceStatus,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and database status"),
        (name = "Authentication", description = "Login, registration and password recovery"),
        (name = "Users", description = "User management operations"),
        (name = "Client Profiles", description = "Client records"),
        (name = "Holdings", description = "Share holdings and their review"),
        (name = "DMAT Accounts", description = "DMAT account records"),
        (name = "Shareholders", description = "Legacy shareholder file")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/login"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/login",
            "/users/{id}",
            "/client-profiles/{id}/holdings/review",
            "/dmat-accounts",
            "/shareholders/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
