use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        auth::require_auth,
        health::health,
        shows::{create_shows, get_show, list_shows},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    // Show routes sit behind the auth stub; /health does not.
    let show_routes = Router::new()
        .route("/shows", get(list_shows).post(create_shows))
        .route("/shows/{*slug}", get(get_show))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .route("/health", get(health))
        .merge(show_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Env};
    use axum::{
        body::Body,
        http::{Request, Response, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn local_config() -> Config {
        Config::from_lookup(|key| match key {
            "APP_ENV" => Some("local".to_string()),
            _ => None,
        })
        .unwrap()
    }

    fn dev_config() -> Config {
        Config::from_lookup(|key| match key {
            "APP_ENV" => Some("dev".to_string()),
            "APP_COGNITO__VALIDSCOPES" => {
                Some("shows-api/shows.read shows-api/shows.write".to_string())
            }
            _ => None,
        })
        .unwrap()
    }

    fn app() -> Router {
        create_app(AppState::in_memory(local_config()))
    }

    async fn body_json(response: Response<Body>) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn post_shows(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/shows")
            .header("Content-Type", "application/json")
            .body(body.into())
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn envelope(payload: Value) -> String {
        json!({
            "payload": payload,
            "skip": 0,
            "take": 10,
            "totalRecords": 75,
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app().oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"message": "ok"}));
    }

    #[tokio::test]
    async fn test_list_shows_empty() {
        let response = app().oneshot(get_request("/shows")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"response": []}));
    }

    #[tokio::test]
    async fn test_create_and_list_shows() {
        let app = app();
        let body = envelope(json!([
            {
                "slug": "show/16kidsandcounting",
                "title": "16 Kids and Counting",
                "drm": true,
                "episodeCount": 3,
                "image": {"showImage": "http://example.com/16kids.jpg"}
            },
            {
                "slug": "show/seapatrol",
                "title": "Sea Patrol",
                "drm": true,
                "episodeCount": 0
            },
            {
                "slug": "show/thetaste",
                "title": "The Taste",
                "drm": false,
                "episodeCount": 2
            }
        ]));

        let response = app.clone().oneshot(post_shows(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(response).await,
            json!({"message": "Shows created successfully"})
        );

        let response = app.oneshot(get_request("/shows")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"response": [{
                "image": "http://example.com/16kids.jpg",
                "slug": "show/16kidsandcounting",
                "title": "16 Kids and Counting"
            }]})
        );
    }

    #[tokio::test]
    async fn test_create_validation_failure_names_index() {
        let body = envelope(json!([
            {"slug": "show/validshow", "title": "Valid Show"},
            {"slug": "show/invalidshow"}
        ]));

        let response = app().oneshot(post_shows(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Validation failed", "details": "payload[1]: title is required"})
        );
    }

    #[tokio::test]
    async fn test_create_invalid_slug() {
        let body = envelope(json!([{"slug": "invalid-slug", "title": "Bad"}]));

        let response = app().oneshot(post_shows(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["details"],
            "payload[0]: slug: must be in a valid format."
        );
    }

    #[tokio::test]
    async fn test_create_rejects_out_of_range_take() {
        let body = json!({
            "payload": [{"slug": "show/a", "title": "A"}],
            "take": 101
        })
        .to_string();

        let response = app().oneshot(post_shows(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["details"],
            "take must be between 1 and 100"
        );
    }

    #[tokio::test]
    async fn test_create_rejects_empty_payload() {
        let body = envelope(json!([]));

        let response = app().oneshot(post_shows(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["details"],
            "payload must contain between 1 and 1000 items"
        );
    }

    #[tokio::test]
    async fn test_create_malformed_json() {
        let response = app().oneshot(post_shows("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_create_duplicate_slug_conflicts() {
        let app = app();
        let body = envelope(json!([{"slug": "show/dup", "title": "Dup"}]));

        let response = app.clone().oneshot(post_shows(body.clone())).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = app.oneshot(post_shows(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_get_show_by_slug() {
        let app = app();
        let body = envelope(json!([{"slug": "show/test", "title": "Test"}]));
        app.clone().oneshot(post_shows(body)).await.unwrap();

        let response = app.clone().oneshot(get_request("/shows/show/test")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"image": "", "slug": "show/test", "title": "Test"})
        );

        let response = app.oneshot(get_request("/shows/show/missing")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, json!({"error": "show not found"}));
    }

    #[tokio::test]
    async fn test_auth_required_outside_local() {
        let config = dev_config();
        assert_eq!(config.env, Env::Dev);
        let app = create_app(AppState::in_memory(config));

        let response = app.clone().oneshot(get_request("/shows")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            json!({"error": "Authorization header required"})
        );

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/shows")
                    .header("Authorization", "Basic abcdefghijkl")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/shows")
                    .header("Authorization", "Bearer short")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/shows")
                    .header("Authorization", "Bearer a-long-enough-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_skips_auth() {
        let app = create_app(AppState::in_memory(dev_config()));

        let response = app.oneshot(get_request("/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
