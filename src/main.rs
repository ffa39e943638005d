use std::sync::Arc;

use minibank::api::{self, AppState};
use minibank::config::AppConfig;
use minibank::logging;
use minibank::store::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = std::env::var("APP_ENV").unwrap_or_else(|_| "dev".to_string());
    let config = AppConfig::load(&env);
    let _log_guard = logging::init_logging(&config);

    let store = Store::connect(&config.database_url).await?;
    store.init_schema().await?;

    let state = Arc::new(AppState::new(store, &config));
    let app = api::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("minibank listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
