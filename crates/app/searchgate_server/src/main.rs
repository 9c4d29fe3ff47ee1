//! Searchgate server binary.
//!
//! Loads configuration from the environment, connects the identity store,
//! search engine, and queue producer, and serves the API until shutdown.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use searchgate_api::config::Config;
use searchgate_api::{AppState, router};
use searchgate_core::engine::{ElasticEngine, SearchEngine};
use searchgate_core::queue::{DocumentQueue, RestQueueProducer};
use searchgate_core::store::{IdentityStore, PgIdentityStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // LOG_LEVEL seeds the default filter; RUST_LOG still wins when set.
    let default_filter = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    info!("loading configuration from environment");
    let config = Config::from_env().inspect_err(|e| error!(error = %e, "configuration error"))?;

    info!(db_addr = %config.db_addr, db = %config.db_name, "connecting identity store");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&config.database_url())
        .await
        .inspect_err(|e| error!(error = %e, "identity store connection failed"))?;

    let store: Arc<dyn IdentityStore> = Arc::new(PgIdentityStore::new(pool));
    let engine: Arc<dyn SearchEngine> = Arc::new(
        ElasticEngine::new(&config.engine_urls, &config.engine_api_key)
            .inspect_err(|e| error!(error = %e, "search engine client init failed"))?,
    );
    let queue: Arc<dyn DocumentQueue> = Arc::new(
        RestQueueProducer::new(&config.queue_addrs, &config.queue_topic)
            .inspect_err(|e| error!(error = %e, "queue producer init failed"))?,
    );

    let listen_addr = config.listen_addr.clone();
    let state = AppState {
        store,
        engine,
        queue,
        config: Arc::new(config),
    };

    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&listen_addr)
        .await
        .inspect_err(|e| error!(addr = %listen_addr, error = %e, "bind failed"))?;

    info!(addr = %listen_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
