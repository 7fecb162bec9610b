//! OpenAPI documentation configuration.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{account_handler, auth_handler, cooling_handler};
use crate::domain::thermal::{HeatFlow, NodeTemperature};
use crate::domain::{CoolingData, CoolingResponse, ThermalSolution, UserResponse};
use crate::services::{AccessToken, TokenPair};
use crate::types::{CoolingPage, PaginationMeta};

/// OpenAPI documentation for the Cooling API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cooling API",
        version = "0.1.0",
        description = "Cooling configuration records with JWT authentication"
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        auth_handler::create_token,
        auth_handler::refresh_token,
        auth_handler::verify_token,
        auth_handler::blacklist_token,
        account_handler::register,
        account_handler::list_users,
        account_handler::get_me,
        account_handler::update_me,
        account_handler::delete_me,
        account_handler::get_user,
        account_handler::set_password,
        account_handler::reset_password,
        account_handler::reset_password_confirm,
        cooling_handler::api_root,
        cooling_handler::list_cooling,
        cooling_handler::create_cooling,
        cooling_handler::get_cooling,
        cooling_handler::replace_cooling,
        cooling_handler::delete_cooling,
        cooling_handler::list_my_cooling,
        cooling_handler::get_my_cooling,
        cooling_handler::replace_my_cooling,
        cooling_handler::delete_my_cooling,
        cooling_handler::demo_model,
        cooling_handler::solve_thermal_model,
    ),
    components(
        schemas(
            UserResponse,
            CoolingData,
            CoolingResponse,
            CoolingPage,
            PaginationMeta,
            ThermalSolution,
            NodeTemperature,
            HeatFlow,
            TokenPair,
            AccessToken,
            auth_handler::LoginRequest,
            auth_handler::RefreshRequest,
            auth_handler::VerifyRequest,
            auth_handler::BlacklistRequest,
            account_handler::RegisterRequest,
            account_handler::UpdateProfileRequest,
            account_handler::DeleteAccountRequest,
            account_handler::SetPasswordRequest,
            account_handler::ResetPasswordRequest,
            account_handler::ResetPasswordConfirmRequest,
            cooling_handler::CoolingRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "JWT issue, refresh, verify and blacklist"),
        (name = "Accounts", description = "Registration, profile and password management"),
        (name = "Cooling", description = "Cooling configuration records"),
        (name = "Thermal", description = "Demo model and solver")
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
                        .description(Some("JWT access token obtained from /auth/jwt/create"))
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
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/jwt/create",
            "/auth/users/me",
            "/auth/users/{id}",
            "/cooling",
            "/cooling/me/{id}",
            "/cooling/solve",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
