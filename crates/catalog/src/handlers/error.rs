use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catalog_core::show::ValidationError;
use catalog_core::storage::{repository_error_to_status_code, RepositoryError};
use serde_json::json;

pub struct AppError(pub anyhow::Error);

impl AppError {
    fn validation(error: &ValidationError) -> Response {
        tracing::warn!(error = %error, "Validation failed");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "Validation failed",
                "details": error.to_string(),
            })),
        )
            .into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(error) = self.0.downcast_ref::<ValidationError>() {
            return Self::validation(error);
        }

        if let Some(rejection) = self.0.downcast_ref::<JsonRejection>() {
            tracing::warn!(error = %rejection, "Rejected request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }

        if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            if let RepositoryError::Validation(error) = repo_error {
                return Self::validation(error);
            }
            let code = repository_error_to_status_code(repo_error);
            let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            if status.is_server_error() {
                tracing::error!(error = %repo_error, "Repository operation failed");
            } else {
                tracing::warn!(error = %repo_error, "Repository operation rejected");
            }
            let message = match repo_error {
                RepositoryError::NotFound { entity_type, .. } => {
                    format!("{} not found", entity_type.to_lowercase())
                }
                other => other.to_string(),
            };
            return (status, Json(json!({ "error": message }))).into_response();
        }

        tracing::error!(error = ?self.0, "Unhandled error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
            .into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
