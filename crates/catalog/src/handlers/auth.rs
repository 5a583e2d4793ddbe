//! Bearer-token auth stub.
//!
//! Skipped in the `local` environment. Elsewhere a bearer token is required
//! and the route's scope must be one of the configured valid scopes. Token
//! signatures are not verified; the token is assumed to carry every
//! configured scope.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use catalog_core::auth::{
    bearer_token, has_valid_scope_from_config, required_scope, AuthError, AuthenticatedUser,
};

use crate::{config::Env, state::AppState};

/// Auth failure rendered as a JSON response.
#[derive(Debug)]
pub struct AuthRejection {
    error: AuthError,
    valid_scopes: Vec<String>,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::UNAUTHORIZED);
        tracing::warn!(error = %self.error, status = status.as_u16(), "Request rejected by auth");

        let body = match &self.error {
            AuthError::InsufficientScope { required_scope } => json!({
                "error": self.error.to_string(),
                "required_scope": required_scope,
                "valid_scopes": self.valid_scopes,
            }),
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}

/// Middleware guarding the show routes.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthRejection> {
    if state.config.env == Env::Local {
        return Ok(next.run(request).await);
    }

    let valid_scopes = &state.config.cognito.valid_scopes;
    let reject = |error| AuthRejection {
        error,
        valid_scopes: valid_scopes.clone(),
    };

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    bearer_token(header).map_err(reject)?;

    let required = required_scope(
        request.method().as_str(),
        request.uri().path(),
        valid_scopes,
    );
    let token_scopes = valid_scopes.clone();

    if !has_valid_scope_from_config(&token_scopes, required, valid_scopes) {
        return Err(reject(AuthError::InsufficientScope {
            required_scope: required.unwrap_or_default().to_string(),
        }));
    }

    request
        .extensions_mut()
        .insert(AuthenticatedUser::placeholder(token_scopes));

    Ok(next.run(request).await)
}
