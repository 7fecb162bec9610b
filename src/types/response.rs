use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;

/// 201 with the created resource as body
pub struct Created<T: Serialize>(pub T);

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> axum::response::Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// 204, used by DELETE and the password endpoints
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> axum::response::Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// 205, returned once a refresh token is blacklisted
pub struct ResetContent;

impl IntoResponse for ResetContent {
    fn into_response(self) -> axum::response::Response {
        StatusCode::RESET_CONTENT.into_response()
    }
}
