//! Request tracking, panic recovery and error body layers

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::any::Any;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};

use crate::error::{labels, ErrorResponse};

/// Sensitive headers that should be masked in logs
pub const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "cookie",
    "set-cookie",
    "x-api-key",
    "x-auth-token",
];

/// Create a request ID layer that assigns `x-request-id` (UUID v4) when absent
pub fn request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::x_request_id(MakeRequestUuid)
}

/// Create a request ID propagation layer
pub fn request_id_propagation_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::x_request_id()
}

/// Create a sensitive headers layer
pub fn sensitive_headers_layer() -> SetSensitiveRequestHeadersLayer {
    let headers = SENSITIVE_HEADERS
        .iter()
        .map(|h| http::HeaderName::from_static(*h))
        .collect::<Vec<_>>();

    SetSensitiveRequestHeadersLayer::new(headers)
}

/// Panic recovery layer answering with the standard 500 error body
pub fn panic_layer() -> CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response> {
    CatchPanicLayer::custom(handle_panic as fn(Box<dyn Any + Send + 'static>) -> Response)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Handler panicked");

    ErrorResponse::internal("An unexpected error occurred").into_response()
}

/// Give 408 and 413 responses from the timeout and body limit layers the
/// standard JSON error body
///
/// Mounted with [`axum::middleware::map_response`] outside both layers.
/// Responses that already carry JSON pass through untouched.
pub async fn json_layer_errors(response: Response) -> Response {
    let (label, message) = match response.status() {
        StatusCode::PAYLOAD_TOO_LARGE => (
            labels::PAYLOAD_TOO_LARGE,
            "Request body exceeds the configured size limit",
        ),
        StatusCode::REQUEST_TIMEOUT => (
            labels::REQUEST_TIMEOUT,
            "Request did not complete within the configured timeout",
        ),
        _ => return response,
    };

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return response;
    }

    tracing::debug!(status = %response.status(), "Rewriting layer error as JSON");
    ErrorResponse::new(response.status(), label, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_panic_becomes_error_body() {
        let app = Router::new()
            .route("/boom", get(|| async { panic!("kaboom") as () }))
            .layer(panic_layer());

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), http::StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["message"], "An unexpected error occurred");
    }

    #[tokio::test]
    async fn test_request_id_is_set_and_echoed() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(request_id_propagation_layer())
            .layer(request_id_layer());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_empty_timeout_response_gets_error_body() {
        let response = json_layer_errors(StatusCode::REQUEST_TIMEOUT.into_response()).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

        let body = body_json(response).await;
        assert_eq!(body["status"], 408);
        assert_eq!(body["error"], "Request Timeout");
    }

    #[tokio::test]
    async fn test_plain_text_limit_response_gets_error_body() {
        let response = json_layer_errors(
            (StatusCode::PAYLOAD_TOO_LARGE, "length limit exceeded").into_response(),
        )
        .await;
        let body = body_json(response).await;
        assert_eq!(body["status"], 413);
        assert_eq!(body["error"], "Payload Too Large");
    }

    #[tokio::test]
    async fn test_other_responses_pass_through() {
        let response = json_layer_errors((StatusCode::OK, "fine").into_response()).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"fine");

        let json = ErrorResponse::new(StatusCode::PAYLOAD_TOO_LARGE, "custom", "kept")
            .into_response();
        let body = body_json(json_layer_errors(json).await).await;
        assert_eq!(body["error"], "custom");
    }
}
