use anyhow::Context;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use asb_api::{create_router, DbState};

pub mod config;
pub mod output;


use config::Config;

/// Install the fmt subscriber; `RUST_LOG` overrides the default filter
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(asb_config::RUST_LOG)
        .unwrap_or_else(|_| EnvFilter::new(asb_config::DEFAULT_LOG_FILTER));

    // A second init (tests, embedding) keeps the first subscriber
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Serve the ASB API until the process is stopped. With `ephemeral` the
/// drafts live in an in-memory database.
pub async fn run_server(config: Config, ephemeral: bool) -> anyhow::Result<()> {
    let state = if ephemeral {
        info!("Using in-memory draft storage");
        DbState::in_memory().await?
    } else {
        info!("Using draft database at {}", config.database_path.display());
        DbState::init_with_path(&config.database_path).await?
    };

    // Create CORS layer
    let cors = CorsLayer::new()
        .allow_origin(
            config
                .cors_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", config.cors_origin))?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("ASB API listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
