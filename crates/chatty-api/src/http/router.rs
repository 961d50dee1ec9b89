//! Axum router configuration with middleware.
//!
//! All API routes are under `/api/v1/`.
//! Middleware: CORS, request tracing.
//!
//! Swagger UI is mounted at `/swagger-ui` (document at
//! `/api-docs/openapi.json`) unless `server.enable_swagger` is off.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa_swagger_ui::SwaggerUi;

use crate::http::{doc, handlers};
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route(
            "/users/{user_id}/messages",
            post(handlers::chat::save_message).get(handlers::chat::list_messages),
        )
        .route(
            "/users/{user_id}/history",
            get(handlers::chat::get_history),
        );

    let mut router = Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(health_check));

    if state.config.server.enable_swagger {
        router = router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", doc::api_docs()));
        tracing::debug!("Swagger UI enabled at /swagger-ui");
    }

    router
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chatty_types::config::GlobalConfig;
    use tower::ServiceExt;

    use crate::state::test_support::test_state;

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    fn post_message(user: &str, content: &str) -> Request<Body> {
        Request::post(format!("/api/v1/users/{user}/messages"))
            .header("content-type", "application/json")
            .body(Body::from(serde_json::json!({ "content": content }).to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _dir) = test_state(GlobalConfig::default()).await;
        let router = build_router(state);
        let (status, json) = send(&router, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn test_save_then_history() {
        let (state, _dir) = test_state(GlobalConfig::default()).await;
        let router = build_router(state);

        let (status, json) = send(&router, post_message("u1", "hello")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["seq"], 1);
        assert_eq!(json["data"]["user_id"], "u1");

        let (status, _) = send(&router, post_message("u1", "world")).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, json) = send(&router, get("/api/v1/users/u1/history")).await;
        assert_eq!(status, StatusCode::OK);
        let history = json["data"]["history"].as_str().unwrap();
        assert!(history.find("u1: hello").unwrap() < history.find("u1: world").unwrap());
    }

    #[tokio::test]
    async fn test_list_messages_in_order() {
        let (state, _dir) = test_state(GlobalConfig::default()).await;
        let router = build_router(state);
        for content in ["one", "two", "three"] {
            send(&router, post_message("u1", content)).await;
        }
        send(&router, post_message("u2", "other")).await;

        let (status, json) = send(&router, get("/api/v1/users/u1/messages")).await;
        assert_eq!(status, StatusCode::OK);
        let contents: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_unknown_user_history_is_empty_string() {
        let (state, _dir) = test_state(GlobalConfig::default()).await;
        let router = build_router(state);
        let (status, json) = send(&router, get("/api/v1/users/nobody/history")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["history"], "");
    }

    #[tokio::test]
    async fn test_blank_message_rejected_and_not_stored() {
        let (state, _dir) = test_state(GlobalConfig::default()).await;
        let router = build_router(state);

        let (status, json) = send(&router, post_message("u1", "   ")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["code"], "VALIDATION_ERROR");

        let (_, json) = send(&router, get("/api/v1/users/u1/messages")).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_bad_body_uses_error_envelope() {
        let (state, _dir) = test_state(GlobalConfig::default()).await;
        let router = build_router(state);

        let missing_content = Request::post("/api/v1/users/u1/messages")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"text": "hello"}"#))
            .unwrap();
        let (status, json) = send(&router, missing_content).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["code"], "VALIDATION_ERROR");

        let not_json = Request::post("/api/v1/users/u1/messages")
            .header("content-type", "application/json")
            .body(Body::from("hello"))
            .unwrap();
        let (status, json) = send(&router, not_json).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["code"], "VALIDATION_ERROR");

        let (_, json) = send(&router, get("/api/v1/users/u1/messages")).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_invalid_user_id_rejected() {
        let (state, _dir) = test_state(GlobalConfig::default()).await;
        let router = build_router(state);
        let (status, json) = send(&router, post_message("%20u1", "hello")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_oversized_message_rejected() {
        let mut config = GlobalConfig::default();
        config.history.max_message_bytes = 5;
        let (state, _dir) = test_state(config).await;
        let router = build_router(state);

        let (status, _) = send(&router, post_message("u1", "12345")).await;
        assert_eq!(status, StatusCode::CREATED);
        let (status, _) = send(&router, post_message("u1", "123456")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_openapi_served_when_enabled() {
        let (state, _dir) = test_state(GlobalConfig::default()).await;
        let router = build_router(state);
        let (status, json) = send(&router, get("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["paths"]["/api/v1/users/{user_id}/history"].is_object());
        assert!(json["paths"]["/api/v1/users/{user_id}/messages"]["post"].is_object());
    }

    #[tokio::test]
    async fn test_openapi_hidden_when_disabled() {
        let mut config = GlobalConfig::default();
        config.server.enable_swagger = false;
        let (state, _dir) = test_state(config).await;
        let router = build_router(state);
        let (status, _) = send(&router, get("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
