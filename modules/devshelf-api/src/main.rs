use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use devshelf_api::{router, AppState};
use devshelf_common::Config;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("devshelf=info".parse()?)
                .add_directive("chat_client=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let state = Arc::new(AppState::from_config(&config));

    for (kind, available) in state.aggregator.availability() {
        info!(provider = %kind, available, "Provider registered");
    }

    let app = router(state);

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!("DevShelf API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
