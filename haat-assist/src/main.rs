//! haat-assist - Shopping assistant microservice
//!
//! **Module Identity:**
//! - Name: haat-assist
//! - Default port: 5780
//!
//! Turns free-text shopping queries into catalog filters and drafts product
//! descriptions for sellers. A Gemini oracle is used when an API key is
//! configured; the deterministic rules in `haat-common` answer otherwise.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use haat_assist::services::{select_oracle, ShoppingAssistant};
use haat_assist::AppState;
use haat_common::config;

/// Command-line arguments for haat-assist
#[derive(Parser, Debug)]
#[command(name = "haat-assist")]
#[command(about = "Shopping assistant microservice for Haat")]
#[command(version)]
struct Args {
    /// Port to listen on (overrides config file)
    #[arg(short, long, env = "HAAT_ASSIST_PORT")]
    port: Option<u16>,

    /// Address to bind (overrides config file)
    #[arg(short, long, env = "HAAT_ASSIST_BIND")]
    bind: Option<String>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = config::resolve_config_path(args.config.as_deref());
    let toml_config = config::load_or_default(config_path.as_deref())
        .context("Failed to load configuration")?;

    let default_filter = format!(
        "haat_assist={level},haat_common={level},tower_http={level}",
        level = toml_config.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting haat-assist v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE"),
    );
    match &config_path {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config directory available, using defaults"),
    }

    let port = args.port.unwrap_or(toml_config.port);
    let bind = args.bind.unwrap_or_else(|| toml_config.bind_addr.clone());
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    let assistant = ShoppingAssistant::new(select_oracle(&toml_config));
    let state = AppState::new(assistant, toml_config.max_query_len);
    let app = haat_assist::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("haat-assist stopped");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install terminate handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
