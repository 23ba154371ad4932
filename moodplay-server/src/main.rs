//! moodplay-server - emotion-driven playlist service
//!
//! Loads the playlist table once, then serves the landing page and the
//! `/get_playlist` endpoint.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use moodplay_common::config::{ConfigOverrides, ServerConfig};
use moodplay_common::PlaylistTable;
use moodplay_server::{build_router, AppState};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for moodplay-server
#[derive(Parser, Debug)]
#[command(name = "moodplay-server")]
#[command(about = "Maps detected emotions and genres to playlists")]
#[command(version)]
struct Args {
    /// JSON file mapping emotion/genre keys to playlist identifiers
    #[arg(short, long, env = "MOODPLAY_PLAYLISTS")]
    playlists: Option<PathBuf>,

    /// Address to listen on (e.g. 127.0.0.1:5000)
    #[arg(short, long, env = "MOODPLAY_BIND")]
    bind: Option<String>,

    /// Folder served under /static (detector models, images)
    #[arg(short, long, env = "MOODPLAY_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, env = "MOODPLAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ServerConfig::resolve(ConfigOverrides {
        playlists_path: args.playlists,
        bind_addr: args.bind,
        static_dir: args.static_dir,
        config_file: args.config,
    })
    .context("Failed to resolve configuration")?;

    // RUST_LOG takes precedence over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "moodplay_server={level},moodplay_common={level},tower_http={level}",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting moodplay-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config.config_file {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("No config file found, using compiled defaults"),
    }
    info!("Playlist table: {}", config.playlists_path.display());
    info!("Static assets: {}", config.static_dir.display());

    let playlists = match PlaylistTable::load(&config.playlists_path) {
        Ok(table) => table,
        Err(e) => {
            error!(
                "Failed to load playlist table {}: {}",
                config.playlists_path.display(),
                e
            );
            return Err(e).context("Failed to load playlist table");
        }
    };

    let state = AppState::new(playlists).with_static_dir(&config.static_dir);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    info!("moodplay-server listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install signal handler: {}", e);
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
