//! # inventory-service
//!
//! REST service for inventory items: create, read, update, delete, search and
//! paginate records of name, description, quantity and price.
//!
//! - **Storage**: PostgreSQL through sqlx, or an in-memory store when no database is configured
//! - **Validation**: every field rule checked, violations reported together
//! - **Errors**: one JSON error shape for validation, parse, lookup and server failures
//! - **Middleware stack**: request tracking, panic recovery, body size limits, compression, CORS
//! - **Health checks**: liveness and readiness probes
//! - **Graceful shutdown**: SIGTERM and SIGINT
//!
//! ## Example
//!
//! ```rust,no_run
//! use inventory_service::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config);
//!
//!     let state = AppState::builder()
//!         .config(config.clone())
//!         .build()
//!         .await?;
//!
//!     Server::new(config).serve(app(state)).await
//! }
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod pagination;
pub mod server;
pub mod service;
pub mod state;
pub mod store;
pub mod validation;

/// Commonly used types
pub mod prelude {
    pub use crate::config::{ApiConfig, Config, DatabaseConfig, MiddlewareConfig, ServiceConfig};
    pub use crate::error::{Error, ErrorResponse, FieldViolation, Result};
    pub use crate::handlers::{app, ApiJson, ApiPath, ApiQuery};
    pub use crate::health::{health, readiness};
    pub use crate::models::{Item, ItemDto};
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{Page, PageRequest, Sort, SortDirection, SortField};
    pub use crate::server::Server;
    pub use crate::service::{ItemService, SearchCriteria};
    pub use crate::state::{AppState, AppStateBuilder};
    pub use crate::store::{
        ItemStore, MemoryItemStore, PgItemStore, StoreError, StoreErrorKind, StoreOperation,
    };
    pub use crate::validation::validate_item;
}
