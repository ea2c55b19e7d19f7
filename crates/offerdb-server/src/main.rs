mod api;
mod middleware;

use std::sync::Arc;

use offerdb_db::PgOfferStore;
use offerdb_scraper::{OfferScraper, ScraperConfig};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = offerdb_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = offerdb_db::PoolConfig::from_app_config(&config);
    let pool = offerdb_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = offerdb_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations complete");

    let scraper = OfferScraper::new(ScraperConfig::from_app_config(&config));
    let app = build_app(AppState {
        store: PgOfferStore::new(pool),
        scraper: Arc::new(scraper),
        cache_ttl: config.cache_ttl(),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "offerdb server listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
