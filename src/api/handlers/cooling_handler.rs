//! Cooling record handlers, the API root and the thermal endpoints.

use axum::{
    extract::{Extension, Path, Query, State},
    http::{header, HeaderMap},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::config::MAX_COOLING_NAME_LENGTH;
use crate::domain::{thermal, CoolingData, CoolingResponse, ThermalModel, ThermalSolution};
use crate::errors::AppResult;
use crate::services::{CoolingInput, CoolingScope};
use crate::types::{CoolingPage, Created, NoContent, PaginationParams};

/// Body for create and full replace
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CoolingRequest {
    #[validate(length(max = MAX_COOLING_NAME_LENGTH, message = "Ensure this field has no more than 255 characters."))]
    #[schema(example = "Inverter cold plate")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub data: CoolingData,
    /// Owning user; defaults to the caller on create
    pub owner: Option<Uuid>,
}

impl From<CoolingRequest> for CoolingInput {
    fn from(req: CoolingRequest) -> Self {
        Self {
            name: req.name,
            data: req.data,
            owner: req.owner,
        }
    }
}

/// Routes under `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new().route("/", get(api_root))
}

/// Routes under `/cooling`
pub fn cooling_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cooling).post(create_cooling))
        .route("/me", get(list_my_cooling))
        .route(
            "/me/:id",
            get(get_my_cooling)
                .put(replace_my_cooling)
                .delete(delete_my_cooling),
        )
        .route("/demo_model", get(demo_model))
        .route("/solve", post(solve_thermal_model))
        .route(
            "/:id",
            get(get_cooling).put(replace_cooling).delete(delete_cooling),
        )
}

/// Absolute URL of `path` as seen by the client.
fn absolute_url(headers: &HeaderMap, path: &str) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let scheme = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");

    format!("{}://{}{}", scheme, host, path)
}

/// API root with links to the collections
#[utoipa::path(
    get,
    path = "/api",
    tag = "Cooling",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Collection links", example = json!({"cooling": "http://localhost:3000/cooling"})),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn api_root(headers: HeaderMap) -> Json<Value> {
    Json(json!({ "cooling": absolute_url(&headers, "/cooling") }))
}

/// List every cooling record
#[utoipa::path(
    get,
    path = "/cooling",
    tag = "Cooling",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of records", body = CoolingPage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_cooling(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<CoolingPage>> {
    let page = state.cooling_service.list(CoolingScope::All, params).await?;
    Ok(Json(page.map(CoolingResponse::from)))
}

/// Create a cooling record
#[utoipa::path(
    post,
    path = "/cooling",
    tag = "Cooling",
    security(("bearer_auth" = [])),
    request_body = CoolingRequest,
    responses(
        (status = 201, description = "Record created", body = CoolingResponse),
        (status = 400, description = "Validation error or unknown owner"),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn create_cooling(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CoolingRequest>,
) -> AppResult<Created<CoolingResponse>> {
    let record = state
        .cooling_service
        .create(current_user.id, payload.into())
        .await?;

    Ok(Created(CoolingResponse::from(record)))
}

/// Get a cooling record by id
#[utoipa::path(
    get,
    path = "/cooling/{id}",
    tag = "Cooling",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record", body = CoolingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn get_cooling(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CoolingResponse>> {
    let record = state.cooling_service.get(CoolingScope::All, id).await?;
    Ok(Json(record.into()))
}

/// Replace a cooling record
#[utoipa::path(
    put,
    path = "/cooling/{id}",
    tag = "Cooling",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Record ID")),
    request_body = CoolingRequest,
    responses(
        (status = 200, description = "Updated record", body = CoolingResponse),
        (status = 400, description = "Validation error or unknown owner"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn replace_cooling(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CoolingRequest>,
) -> AppResult<Json<CoolingResponse>> {
    let record = state
        .cooling_service
        .replace(CoolingScope::All, id, payload.into())
        .await?;
    Ok(Json(record.into()))
}

/// Delete a cooling record
#[utoipa::path(
    delete,
    path = "/cooling/{id}",
    tag = "Cooling",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Record not found")
    )
)]
pub async fn delete_cooling(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state.cooling_service.delete(CoolingScope::All, id).await?;
    Ok(NoContent)
}

/// List the caller's cooling records
#[utoipa::path(
    get,
    path = "/cooling/me",
    tag = "Cooling",
    security(("bearer_auth" = [])),
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of the caller's records", body = CoolingPage),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn list_my_cooling(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<CoolingPage>> {
    let page = state
        .cooling_service
        .list(CoolingScope::OwnedBy(current_user.id), params)
        .await?;
    Ok(Json(page.map(CoolingResponse::from)))
}

/// Get one of the caller's records
#[utoipa::path(
    get,
    path = "/cooling/me/{id}",
    tag = "Cooling",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Record ID")),
    responses(
        (status = 200, description = "Record", body = CoolingResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such record owned by the caller")
    )
)]
pub async fn get_my_cooling(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<CoolingResponse>> {
    let record = state
        .cooling_service
        .get(CoolingScope::OwnedBy(current_user.id), id)
        .await?;
    Ok(Json(record.into()))
}

/// Replace one of the caller's records
#[utoipa::path(
    put,
    path = "/cooling/me/{id}",
    tag = "Cooling",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Record ID")),
    request_body = CoolingRequest,
    responses(
        (status = 200, description = "Updated record", body = CoolingResponse),
        (status = 400, description = "Validation error or unknown owner"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such record owned by the caller")
    )
)]
pub async fn replace_my_cooling(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<CoolingRequest>,
) -> AppResult<Json<CoolingResponse>> {
    let record = state
        .cooling_service
        .replace(CoolingScope::OwnedBy(current_user.id), id, payload.into())
        .await?;
    Ok(Json(record.into()))
}

/// Delete one of the caller's records
#[utoipa::path(
    delete,
    path = "/cooling/me/{id}",
    tag = "Cooling",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Record ID")),
    responses(
        (status = 204, description = "Record deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No such record owned by the caller")
    )
)]
pub async fn delete_my_cooling(
    Extension(current_user): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<NoContent> {
    state
        .cooling_service
        .delete(CoolingScope::OwnedBy(current_user.id), id)
        .await?;
    Ok(NoContent)
}

/// Example thermal model
#[utoipa::path(
    get,
    path = "/cooling/demo_model",
    tag = "Thermal",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Demo configuration", body = CoolingData),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn demo_model() -> Json<ThermalModel> {
    Json(thermal::demo_model())
}

/// Solve a thermal model
///
/// Any JSON body is accepted; the result set is fixed.
#[utoipa::path(
    post,
    path = "/cooling/solve",
    tag = "Thermal",
    security(("bearer_auth" = [])),
    request_body = CoolingData,
    responses(
        (status = 200, description = "Solver result", body = ThermalSolution),
        (status = 401, description = "Unauthorized")
    )
)]
pub async fn solve_thermal_model(body: Option<Json<Value>>) -> Json<ThermalSolution> {
    let model = body
        .and_then(|Json(value)| serde_json::from_value::<ThermalModel>(value).ok())
        .unwrap_or_default();

    Json(thermal::solve(&model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_absolute_url_uses_host_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("api.example.com"));
        assert_eq!(
            absolute_url(&headers, "/cooling"),
            "http://api.example.com/cooling"
        );

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(
            absolute_url(&headers, "/cooling"),
            "https://api.example.com/cooling"
        );
    }

    #[test]
    fn test_request_flattens_blob_arrays() {
        let req: CoolingRequest = serde_json::from_value(json!({
            "name": "loop",
            "fluids": [{"name": "water"}],
            "owner": null
        }))
        .unwrap();

        let input = CoolingInput::from(req);
        assert_eq!(input.name.as_deref(), Some("loop"));
        assert_eq!(input.data.fluids.as_ref().map(Vec::len), Some(1));
        assert!(input.data.components.is_none());
        assert!(input.owner.is_none());
    }

    #[tokio::test]
    async fn test_solve_accepts_arbitrary_json() {
        let Json(a) = solve_thermal_model(Some(Json(json!({"anything": 1})))).await;
        let Json(b) = solve_thermal_model(None).await;
        assert_eq!(a, b);
    }
}
