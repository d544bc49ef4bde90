//! pathwise-web - study path recommendation service
//!
//! Loads the trained vocabularies and forests, then serves the JSON API.
//! Model loading is a startup barrier: if any artifact is missing or corrupt
//! the process exits before binding the listener.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use pathwise_common::config::{ConfigOverrides, ResolvedConfig, TomlConfig};
use pathwise_common::db::init_database;
use pathwise_common::{CompatibilityTable, ModelBundle, RecommendationService};
use pathwise_web::{build_router, AppState};
use tokio::signal;
use tracing::{error, info, warn};

/// Command-line arguments for pathwise-web
#[derive(Parser, Debug)]
#[command(name = "pathwise-web")]
#[command(about = "Study path recommendation service")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "PATHWISE_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long, env = "PATHWISE_PORT")]
    port: Option<u16>,

    /// Root folder holding models/ and users.db
    #[arg(short, long, env = "PATHWISE_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Directory with trained model artifacts
    #[arg(short, long, env = "PATHWISE_MODELS_DIR")]
    models_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before logging is set up so its level can apply
    let toml_config = TomlConfig::load(args.config.as_deref())?;
    let config = ResolvedConfig::resolve(
        toml_config,
        ConfigOverrides {
            root_folder: args.root_folder,
            models_dir: args.models_dir,
            port: args.port,
        },
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("Starting Pathwise (pathwise-web) v{}", env!("CARGO_PKG_VERSION"));
    info!("Root folder: {}", config.root_folder.display());

    let bundle = match ModelBundle::load(&config.models_dir) {
        Ok(bundle) => bundle,
        Err(e) => {
            error!("Failed to load models: {}", e);
            error!("Run pathwise-train to produce artifacts in {}", config.models_dir.display());
            return Err(e).context("Model loading failed");
        }
    };

    let service = RecommendationService::new(CompatibilityTable::default(), bundle);
    let report = service.check_consistency();
    if report.is_consistent() {
        info!("✓ Compatibility table fully covered by trained vocabularies");
    } else {
        warn!(
            "{} primary and {} secondary interests will return placeholder suggestions",
            report.missing_primary.len(),
            report.missing_secondary.len()
        );
    }

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to open user database")?;
    info!("✓ User database: {}", config.database_path.display());

    let state = AppState::new(Arc::new(service), pool);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .context("Invalid bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;
    info!("pathwise-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

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
            Ok(mut stream) => {
                stream.recv().await;
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
