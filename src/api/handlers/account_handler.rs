//! Account handlers mounted under `/auth/users`.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::MAX_NAME_LENGTH;
use crate::domain::{NewUser, UserResponse};
use crate::errors::AppResult;
use crate::types::{Created, NoContent};

/// Registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "Enter a valid email address."))]
    #[schema(example = "user@example.com")]
    pub email: String,
    /// Checked against the password policy
    #[schema(example = "Thermal-Flow-42", min_length = 8)]
    pub password: String,
    #[validate(length(max = MAX_NAME_LENGTH, message = "Ensure this field has no more than 150 characters."))]
    #[serde(default)]
    #[schema(example = "Ada")]
    pub first_name: String,
    #[validate(length(max = MAX_NAME_LENGTH, message = "Ensure this field has no more than 150 characters."))]
    #[serde(default)]
    #[schema(example = "Lovelace")]
    pub last_name: String,
}

/// Profile update; absent fields are left alone
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(max = MAX_NAME_LENGTH, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: Option<String>,
    #[validate(length(max = MAX_NAME_LENGTH, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct DeleteAccountRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub current_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SetPasswordRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(email(message = "Enter a valid email address."))]
    #[schema(example = "user@example.com")]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordConfirmRequest {
    /// `{uid}.{timestamp}-{signature}` from the reset email
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub token: String,
    pub new_password: String,
}

/// Routes open to anonymous clients
pub fn public_account_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(register))
        .route("/reset_password", post(reset_password))
        .route("/reset_password_confirm", post(reset_password_confirm))
}

/// Routes that need a bearer token
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route(
            "/me",
            get(get_me)
                .put(update_me)
                .patch(update_me)
                .delete(delete_me),
        )
        .route("/set_password", post(set_password))
        .route("/:id", get(get_user))
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/auth/users",
    tag = "Accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<Created<UserResponse>> {
    let user = state
        .account_service
        .register(NewUser {
            email: payload.email,
            password: payload.password,
            first_name: payload.first_name,
            last_name: payload.last_name,
            ..Default::default()
        })
        .await?;

    Ok(Created(UserResponse::from(user)))
}

/// List visible accounts
#[utoipa::path(
    get,
    path = "/auth/users",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Every account for staff, otherwise only the caller", body = Vec<UserResponse>),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_users(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.account_service.list_visible(current_user.id).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Get current authenticated user
#[utoipa::path(
    get,
    path = "/auth/users/me",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserResponse),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn get_me(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
) -> AppResult<Json<UserResponse>> {
    if let Some(user) = state.cache.get_user(&current_user.id).await? {
        return Ok(Json(user));
    }

    let user = UserResponse::from(state.account_service.get_user(current_user.id).await?);
    state.cache.set_user(&user).await?;

    Ok(Json(user))
}

/// Update the caller's name
#[utoipa::path(
    patch,
    path = "/auth/users/me",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn update_me(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .account_service
        .update_profile(current_user.id, payload.first_name, payload.last_name)
        .await?;
    state.cache.invalidate_user(&current_user.id).await?;

    Ok(Json(UserResponse::from(user)))
}

/// Delete the caller's account
#[utoipa::path(
    delete,
    path = "/auth/users/me",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = DeleteAccountRequest,
    responses(
        (status = 204, description = "Account deleted"),
        (status = 400, description = "Wrong password"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn delete_me(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<DeleteAccountRequest>,
) -> AppResult<NoContent> {
    state
        .account_service
        .delete_account(current_user.id, &payload.current_password)
        .await?;
    state.cache.invalidate_user(&current_user.id).await?;

    Ok(NoContent)
}

/// Get an account by id (own account or staff)
#[utoipa::path(
    get,
    path = "/auth/users/{id}",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not your account"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    let user = state.account_service.get_visible(current_user.id, id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Change the caller's password
#[utoipa::path(
    post,
    path = "/auth/users/set_password",
    tag = "Accounts",
    security(("bearer_auth" = [])),
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Wrong current password or weak new password"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn set_password(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SetPasswordRequest>,
) -> AppResult<NoContent> {
    state
        .account_service
        .set_password(
            current_user.id,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    Ok(NoContent)
}

/// Email a password reset link
#[utoipa::path(
    post,
    path = "/auth/users/reset_password",
    tag = "Accounts",
    request_body = ResetPasswordRequest,
    responses(
        (status = 204, description = "Accepted whether or not the account exists"),
        (status = 400, description = "Validation error")
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordRequest>,
) -> AppResult<NoContent> {
    state
        .account_service
        .request_password_reset(&payload.email)
        .await?;

    Ok(NoContent)
}

/// Set a new password using a reset token
#[utoipa::path(
    post,
    path = "/auth/users/reset_password_confirm",
    tag = "Accounts",
    request_body = ResetPasswordConfirmRequest,
    responses(
        (status = 204, description = "Password reset"),
        (status = 400, description = "Invalid token for given user, or weak password")
    )
)]
pub async fn reset_password_confirm(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ResetPasswordConfirmRequest>,
) -> AppResult<NoContent> {
    state
        .account_service
        .confirm_password_reset(&payload.token, &payload.new_password)
        .await?;

    Ok(NoContent)
}
