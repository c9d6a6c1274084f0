//! folio-web - portfolio site server
//!
//! Serves the landing page, project detail views, per-page view sessions and
//! the brief lab.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use folio_common::config::{default_config_path, load_toml_config_or_default};
use folio_common::content::Catalog;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use folio_web::config::{Overrides, SiteConfig};
use folio_web::{build_router, AppState};

/// Command-line arguments for folio-web
#[derive(Parser, Debug)]
#[command(name = "folio-web")]
#[command(about = "Portfolio site server")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "FOLIO_PORT")]
    port: Option<u16>,

    /// Address to bind
    #[arg(short, long, env = "FOLIO_BIND")]
    bind: Option<String>,

    /// Highlight reel auto-advance interval in milliseconds
    #[arg(long, env = "FOLIO_CAROUSEL_INTERVAL_MS")]
    carousel_interval_ms: Option<u64>,

    /// Generative model used by the brief lab
    #[arg(long, env = "FOLIO_GEMINI_MODEL")]
    gemini_model: Option<String>,

    /// TOML configuration file (default: ~/.config/folio/config.toml)
    #[arg(short, long, env = "FOLIO_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let (toml_config, config_source) = load_toml_config_or_default(config_path.as_deref());

    // RUST_LOG wins; otherwise the TOML level applies to our crates
    let default_filter = format!(
        "folio_web={level},folio_common={level},tower_http=info",
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
        "Starting folio-web v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    config_source.log();

    let config = SiteConfig::resolve(
        Overrides {
            bind_addr: args.bind,
            port: args.port,
            carousel_interval_ms: args.carousel_interval_ms,
            gemini_model: args.gemini_model,
        },
        &toml_config,
    );

    let catalog = Catalog::builtin().context("Failed to build project catalog")?;
    info!(
        "Catalog: {} projects, {} highlight slides",
        catalog.projects().len(),
        catalog.highlights().len()
    );

    let state = AppState::from_config(catalog, &config);
    info!(
        "Highlight reel interval: {} ms; brief lab {}",
        config.carousel_interval.as_millis(),
        if state.brief_enabled {
            format!("enabled ({})", config.gemini_model)
        } else {
            "disabled".to_string()
        }
    );
    let sessions = state.sessions.clone();
    let app = build_router(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("folio-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    // Closing the sessions ends their event streams so the drain can finish
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            sessions.close_all().await;
        })
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
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
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
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
