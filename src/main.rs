use std::{net::SocketAddr, sync::Arc, time::Duration};

use qtable::{
    config::Config,
    create_app,
    database::{Database, MemoryStore},
    handlers::AppState,
    logging,
    services::{LogMailer, Mailer, MetricsService, QuotableClient, QuoteSource},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    let config = Config::from_env()?;

    let metrics = Arc::new(MetricsService::new()?);
    let source: Arc<dyn QuoteSource> = Arc::new(QuotableClient::new(
        &config.quote_api_url,
        Duration::from_secs(config.quote_api_timeout_secs),
        metrics.clone(),
    )?);
    let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);

    let state = match config.database_url.as_deref() {
        Some(database_url) => {
            let database = Database::new(database_url, config.database_max_connections).await?;
            database.migrate().await?;
            tracing::info!("connected to postgres, migrations applied");
            AppState::new(&config, Arc::new(database), source, mailer, metrics)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; data is kept in memory and lost on restart");
            AppState::new(&config, Arc::new(MemoryStore::new()), source, mailer, metrics)
        }
    };

    let app = create_app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, quote_api = %config.quote_api_url, "qtable listening");

    axum::serve(listener, app).await?;
    Ok(())
}
