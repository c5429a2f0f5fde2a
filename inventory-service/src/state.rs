//! Application state management

use std::sync::Arc;

use crate::{
    config::Config,
    database,
    error::Result,
    service::ItemService,
    store::{ItemStore, MemoryItemStore, PgItemStore},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    items: ItemService,
}

impl AppState {
    /// Create state over an explicit store
    pub fn new(config: Config, store: Arc<dyn ItemStore>) -> Self {
        Self {
            config: Arc::new(config),
            items: ItemService::new(store),
        }
    }

    /// Create a new builder for AppState
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the item service
    pub fn items(&self) -> &ItemService {
        &self.items
    }
}

/// Builder for [`AppState`]
///
/// Without an explicit store, `build()` connects to PostgreSQL when
/// `[database]` is configured and falls back to the in-memory store otherwise.
#[derive(Default)]
pub struct AppStateBuilder {
    config: Option<Config>,
    store: Option<Arc<dyn ItemStore>>,
}

impl AppStateBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Use this store instead of the configured one
    pub fn store(mut self, store: Arc<dyn ItemStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Build the AppState, connecting to the database if needed
    pub async fn build(self) -> Result<AppState> {
        let config = self.config.unwrap_or_default();

        let store = match (self.store, &config.database) {
            (Some(store), _) => store,
            (None, Some(db_config)) => {
                let pool = database::create_pool(db_config).await?;
                let pg = PgItemStore::new(pool);
                if db_config.run_migrations {
                    pg.initialize().await?;
                }
                tracing::info!("Using PostgreSQL item store");
                Arc::new(pg) as Arc<dyn ItemStore>
            }
            (None, None) => {
                tracing::warn!("No [database] configured; items are kept in memory only");
                Arc::new(MemoryItemStore::new()) as Arc<dyn ItemStore>
            }
        };

        Ok(AppState::new(config, store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builder_defaults_to_memory_store() {
        let state = AppState::builder().build().await.unwrap();
        assert_eq!(state.config().service.port, 8080);
        assert!(state.items().store().health_check().await.is_ok());
        assert!(state.items().store().find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_builder_uses_supplied_store() {
        let mut config = Config::default();
        config.service.name = "custom".into();

        let state = AppState::builder()
            .config(config)
            .store(Arc::new(MemoryItemStore::new()))
            .build()
            .await
            .unwrap();
        assert_eq!(state.config().service.name, "custom");
    }
}
