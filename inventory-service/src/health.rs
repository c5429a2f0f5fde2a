//! Health check handlers

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service name
    pub service: String,

    /// Version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Readiness check response with dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Service name
    pub service: String,

    /// Dependency statuses
    pub dependencies: HashMap<String, DependencyStatus>,
}

/// Individual dependency status
#[derive(Debug, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dependency is healthy
    pub healthy: bool,

    /// Optional message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check (liveness probe)
///
/// Always returns 200 OK if the service is running.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        service: state.config().service.name.clone(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check (readiness probe)
///
/// Returns 200 OK when the item store answers, 503 Service Unavailable otherwise.
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let mut dependencies = HashMap::new();

    let store_status = match state.items().store().health_check().await {
        Ok(()) => DependencyStatus {
            healthy: true,
            message: Some("Connected".to_string()),
        },
        Err(e) => {
            tracing::error!("Item store health check failed: {}", e);
            DependencyStatus {
                healthy: false,
                message: Some(format!("Health check failed: {}", e.kind)),
            }
        }
    };
    let ready = store_status.healthy;
    dependencies.insert("store".to_string(), store_status);

    let response = ReadinessResponse {
        ready,
        service: state.config().service.name.clone(),
        dependencies,
    };

    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        handlers,
        models::Item,
        pagination::{Page, PageRequest},
        store::{
            ItemStore, MemoryItemStore, StoreError, StoreErrorKind, StoreOperation, StoreResult,
        },
    };
    use async_trait::async_trait;
    use axum::{body::Body, http::Request};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Store whose every call fails as if the database were down
    struct DownStore;

    fn down(op: StoreOperation) -> StoreError {
        StoreError::new(op, StoreErrorKind::ConnectionFailed, "connection refused")
    }

    #[async_trait]
    impl ItemStore for DownStore {
        async fn find_all(&self) -> StoreResult<Vec<Item>> {
            Err(down(StoreOperation::FindAll))
        }
        async fn find_page(&self, _: &PageRequest) -> StoreResult<Page<Item>> {
            Err(down(StoreOperation::FindPage))
        }
        async fn find_by_id(&self, _: i64) -> StoreResult<Option<Item>> {
            Err(down(StoreOperation::FindById))
        }
        async fn find_by_name_containing_ignore_case(&self, _: &str) -> StoreResult<Vec<Item>> {
            Err(down(StoreOperation::FindByName))
        }
        async fn save(&self, _: Item) -> StoreResult<Item> {
            Err(down(StoreOperation::Save))
        }
        async fn delete(&self, _: &Item) -> StoreResult<()> {
            Err(down(StoreOperation::Delete))
        }
        async fn health_check(&self) -> StoreResult<()> {
            Err(down(StoreOperation::HealthCheck))
        }
    }

    async fn get(store: Arc<dyn ItemStore>, uri: &str) -> (StatusCode, serde_json::Value) {
        let app = handlers::app(AppState::new(Config::default(), store));
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(Arc::new(MemoryItemStore::new()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "inventory-service");
    }

    #[tokio::test]
    async fn test_ready_with_working_store() {
        let (status, body) = get(Arc::new(MemoryItemStore::new()), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ready"], true);
        assert_eq!(body["dependencies"]["store"]["healthy"], true);
    }

    #[tokio::test]
    async fn test_not_ready_when_store_down() {
        let (status, body) = get(Arc::new(DownStore), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["ready"], false);
    }

    #[tokio::test]
    async fn test_store_failure_is_generic_500() {
        let (status, body) = get(Arc::new(DownStore), "/api/items/1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal Server Error");
        assert!(!body["message"]
            .as_str()
            .unwrap()
            .contains("connection refused"));
    }
}
