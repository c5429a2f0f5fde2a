use anyhow::Context;
use inventory_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    init_tracing(&config);

    let state = AppState::builder()
        .config(config.clone())
        .build()
        .await
        .context("failed to initialize item store")?;

    Server::new(config)
        .serve(app(state))
        .await
        .context("server error")?;

    Ok(())
}
