use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use catalog_core::show::{validate_request, CreateShowsRequest, ShowListResponse, ShowSummary};
use catalog_core::storage::RepositoryError;

use crate::{handlers::AppError, state::AppState};

/// Create shows in bulk (POST /shows).
pub async fn create_shows(
    State(state): State<AppState>,
    payload: Result<Json<CreateShowsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) = payload?;

    validate_request(&request)?;
    let count = state.service.create(&request).await?;

    tracing::info!(count, "Created shows from request");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Shows created successfully" })),
    ))
}

/// List DRM-protected shows with episodes (GET /shows).
pub async fn list_shows(
    State(state): State<AppState>,
) -> Result<Json<ShowListResponse>, AppError> {
    let response = state.service.list().await?;
    Ok(Json(ShowListResponse { response }))
}

/// Get a single show by slug (GET /shows/{*slug}).
pub async fn get_show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<ShowSummary>, AppError> {
    let summary = state
        .service
        .get(&slug)
        .await?
        .ok_or(RepositoryError::NotFound {
            entity_type: "Show",
            id: slug,
        })?;
    Ok(Json(summary))
}
