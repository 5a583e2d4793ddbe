use axum::Json;
use serde_json::{json, Value};

/// GET /health - liveness check. Never requires auth.
pub async fn health() -> Json<Value> {
    Json(json!({ "message": "ok" }))
}
