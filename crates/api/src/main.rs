use std::sync::Arc;

use anyhow::Context;

use liftlog_api::app::{self, services::AppServices};
use liftlog_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    liftlog_observability::init();

    let config = ApiConfig::from_env()?;
    let services = Arc::new(AppServices::in_memory(&config));
    let router = app::build_app(&config, services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        caller_header = %config.caller_header,
        ownership_reads = ?config.ownership_reads,
        "listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, router).await?;
    Ok(())
}
