//! Structured logging setup

use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Install the JSON log subscriber
///
/// `RUST_LOG` wins over `service.log_level` when set. Calling this more than
/// once keeps the first subscriber.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.service.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(
            environment = %config.service.environment,
            "Tracing initialized for service: {}",
            config.service.name
        );
    }
}
