//! OpenSASE Print Shop - Self-hosted online print ordering

use anyhow::Result;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use opensase_printshop::api::{self, AppState};
use opensase_printshop::config::AppConfig;

const PRUNE_EVERY: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let state = AppState::new(config.clone());
    state.sessions.spawn_pruner(config.session_idle(), PRUNE_EVERY);

    let app = api::router(state);
    let addr = config.bind_addr();
    tracing::info!("🖨️ OpenSASE Print Shop listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}
