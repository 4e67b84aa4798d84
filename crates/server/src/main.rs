//! Server entry point.

use std::error::Error;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use loomline_server::config::ServerConfig;
use loomline_server::services::token::TokenIssuer;
use loomline_server::state::AppState;
use loomline_server::stream::StreamClient;
use loomline_server::{app, db};

fn main() -> Result<(), Box<dyn Error>> {
    let config = ServerConfig::from_env()?;

    // Sentry must outlive the async runtime so shutdown flushes events.
    let _sentry_guard = config.sentry_dsn.as_deref().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                traces_sample_rate: 0.1,
                ..Default::default()
            },
        ))
    });

    init_tracing();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(config))
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn Error>> {
    let pool = db::create_pool(&config.database_url).await?;

    // Fail fast if the image directory cannot be created.
    tokio::fs::create_dir_all(config.product_upload_dir()).await?;

    let stream = StreamClient::new(
        config.stream.api_key.clone(),
        config.stream.api_secret.clone(),
    )?;
    let tokens = TokenIssuer::new(config.jwt_secret.clone());

    let addr = config.socket_addr();
    let state = AppState::new(config, pool, stream, tokens);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Loomline server listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,loomline_server=debug,tower_http=debug")
        }))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry::integrations::tracing::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
