use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use ticketdesk::config::AppConfig;
use ticketdesk::seed;
use ticketdesk::server;
use ticketdesk::shared::error::set_verbose_errors;
use ticketdesk::shared::state::AppState;
use ticketdesk::shared::utils::{create_conn, run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    set_verbose_errors(config.is_development());

    let pool = create_conn(&config.database_url).context("failed to build database pool")?;
    run_migrations(&pool).map_err(|e| anyhow::anyhow!("{e}"))?;

    if std::env::args().nth(1).as_deref() == Some("seed") {
        seed::run(&pool)?;
        return Ok(());
    }

    let state = Arc::new(AppState { conn: pool, config });
    server::run_server(state).await
}
