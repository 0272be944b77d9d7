use anyhow::Context;
use chirpy::{
    api::routes::create_router,
    auth::SystemClock,
    cli::Cli,
    AppState, ChirpyConfig, ConfigError, DatabaseProvider,
};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let (config, used_defaults) = match ChirpyConfig::load(&cli.config) {
        Ok(config) => (config, false),
        Err(ConfigError::FileNotFound(_)) => (ChirpyConfig::default(), true),
        Err(e) => return Err(e).context("invalid configuration"),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_filter(&config.server.log_level))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if used_defaults {
        warn!(path = %cli.config.display(), "config file not found, using defaults");
    }

    let jwt_secret = config.jwt_secret().context("signing secret unavailable")?;
    let turso_token = config.turso_token()?;

    let clock = Arc::new(SystemClock);
    let provider = DatabaseProvider::from_url(&config.database.url, turso_token);
    if let DatabaseProvider::SQLite { path } = &provider {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
    }
    let stores = provider
        .create_stores(clock.clone())
        .await
        .context("failed to open database")?;
    info!(database = %config.database.url, "storage ready");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(&config, jwt_secret.as_bytes(), stores, clock)?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!(%addr, "chirpy server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
