//! Rabta Ledger server

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rabta_ledger::{
    config::{Config, CONFIG},
    db, handlers,
    state::AppState,
};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.rust_log));
    let registry = tracing_subscriber::registry().with(filter);

    if config.server.log_json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Postgres (migrated) and Redis, both verified before serving
async fn connect(config: &Config) -> anyhow::Result<AppState> {
    let pool = db::create_pool(&config.database).await?;
    db::test_connection(&pool).await?;
    db::run_migrations(&pool).await?;
    tracing::info!("Postgres ready, migrations applied");

    let redis = db::create_redis(&config.redis).await?;
    tracing::info!("Redis ready");

    Ok(AppState::connected(pool, redis, config.clone()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Could not listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing(&CONFIG);

    let state = connect(&CONFIG).await?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let app = handlers::app(state)
        .layer(TimeoutLayer::new(CONFIG.server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors);

    let addr = SocketAddr::new(CONFIG.server.host.parse()?, CONFIG.server.port);
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Rabta Ledger listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
