//! HTTP routing
//!
//! [`app`] assembles every route over the shared [`AppState`]. The result
//! has no middleware; [`crate::server::Server`] adds the layer stack.

use axum::{
    http::{Method, StatusCode, Uri},
    routing::get,
    Router,
};

use crate::{
    error::{labels, ErrorResponse},
    health,
    state::AppState,
};

pub mod extract;
pub mod items;

pub use extract::{ApiJson, ApiPath, ApiQuery};

/// Build the application router
pub fn app(state: AppState) -> Router {
    let diagnostic_routes = state.config().api.diagnostic_routes;

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::readiness))
        .merge(items::routes(diagnostic_routes))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(method: Method, uri: Uri) -> ErrorResponse {
    ErrorResponse::new(
        StatusCode::NOT_FOUND,
        labels::NOT_FOUND,
        format!("No route for {} {}", method, uri.path()),
    )
}

async fn method_not_allowed(method: Method, uri: Uri) -> ErrorResponse {
    ErrorResponse::new(
        StatusCode::METHOD_NOT_ALLOWED,
        labels::METHOD_NOT_ALLOWED,
        format!("Method {} is not supported for {}", method, uri.path()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Config, store::MemoryItemStore};
    use axum::body::Body;
    use axum::http::Request;
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let app = app(AppState::new(
            Config::default(),
            Arc::new(MemoryItemStore::new()),
        ));
        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Resource Not Found");
        assert_eq!(body["message"], "No route for GET /nope");
    }

    #[tokio::test]
    async fn test_unsupported_method_is_json_405() {
        let app = app(AppState::new(
            Config::default(),
            Arc::new(MemoryItemStore::new()),
        ));
        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/items/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], 405);
        assert_eq!(body["error"], "Method Not Allowed");
        assert_eq!(body["message"], "Method PATCH is not supported for /api/items/1");
    }
}
