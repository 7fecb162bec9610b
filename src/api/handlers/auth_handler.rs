//! JWT handlers: create, refresh, verify and blacklist.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::AppState;
use crate::errors::AppResult;
use crate::services::{AccessToken, TokenPair};
use crate::types::ResetContent;

/// Credentials for `POST /auth/jwt/create`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    #[schema(example = "user@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    #[schema(example = "Thermal-Flow-42")]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RefreshRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub refresh: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub token: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BlacklistRequest {
    pub refresh_token: String,
}

/// Create JWT routes, nested under `/auth/jwt`
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_token))
        .route("/refresh", post(refresh_token))
        .route("/verify", post(verify_token))
        .route("/blacklist", post(blacklist_token))
}

/// Obtain an access/refresh token pair
#[utoipa::path(
    post,
    path = "/auth/jwt/create",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token pair issued", body = TokenPair),
        (status = 400, description = "Validation error"),
        (status = 401, description = "No active account found with the given credentials")
    )
)]
pub async fn create_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<Json<TokenPair>> {
    let pair = state
        .auth_service
        .obtain_pair(&payload.email, &payload.password)
        .await?;

    Ok(Json(pair))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/auth/jwt/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessToken),
        (status = 401, description = "Token is invalid, expired or blacklisted")
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RefreshRequest>,
) -> AppResult<Json<AccessToken>> {
    Ok(Json(state.auth_service.refresh(&payload.refresh).await?))
}

/// Check that a token is valid
#[utoipa::path(
    post,
    path = "/auth/jwt/verify",
    tag = "Authentication",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Token is invalid or expired")
    )
)]
pub async fn verify_token(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<VerifyRequest>,
) -> AppResult<Json<Value>> {
    state.auth_service.verify(&payload.token).await?;
    Ok(Json(json!({})))
}

/// Revoke a refresh token (logout)
///
/// Every failure, including a missing or unreadable body, is a bare 400.
#[utoipa::path(
    post,
    path = "/auth/jwt/blacklist",
    tag = "Authentication",
    request_body = BlacklistRequest,
    responses(
        (status = 205, description = "Refresh token blacklisted"),
        (status = 400, description = "Token missing, invalid or not a refresh token")
    )
)]
pub async fn blacklist_token(
    State(state): State<AppState>,
    payload: Result<Json<BlacklistRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return StatusCode::BAD_REQUEST.into_response();
    };

    match state.auth_service.blacklist(&payload.refresh_token).await {
        Ok(()) => ResetContent.into_response(),
        Err(e) => {
            tracing::debug!(error = %e, "Blacklist request rejected");
            StatusCode::BAD_REQUEST.into_response()
        }
    }
}
