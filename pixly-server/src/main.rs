use pixly_core::{AppConfig, ServerConfig};
use pixly_postgres::PostgresImageStore;
use pixly_server::run;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = AppConfig::from_env()?;
    tracing::debug!("connecting to database");

    let store = Arc::new(PostgresImageStore::new(&settings.database_url).await?);

    let config = ServerConfig {
        port: settings.port,
        path: "/images".to_string(),
        store,
    };

    run(config).await
}
