//! GATEHOUSE Server — application entry point.

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod api;
mod config;

use api::AppState;
use config::ServerConfig;
use gatehouse_db::DbManager;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("gatehouse=info".parse()?),
        )
        .json()
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(error = %err, "invalid configuration, refusing to start");
            return Err(err.into());
        }
    };

    let db = DbManager::connect(&config.db).await?;
    gatehouse_db::run_migrations(db.client()).await?;

    let state = AppState::new(db, config.auth.clone());
    let app = api::create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "gatehouse server listening");

    axum::serve(listener, app).await?;

    tracing::info!("gatehouse server stopped");
    Ok(())
}
