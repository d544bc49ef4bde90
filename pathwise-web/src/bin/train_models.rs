//! pathwise-train - offline training job
//!
//! Reads the study-path CSV, fits the five vocabularies and three forests,
//! and writes the eight artifacts the service loads at startup.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pathwise_common::config::{ConfigOverrides, ResolvedConfig, TomlConfig};
use pathwise_common::forest::ForestParams;
use pathwise_common::training::train_from_csv;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pathwise-train")]
#[command(about = "Train Pathwise recommendation models from a CSV dataset")]
#[command(version)]
struct Args {
    /// Training CSV (interest_1, interest_2, suggested_field, degree_options, career_paths)
    #[arg(short, long)]
    data: PathBuf,

    /// TOML configuration file
    #[arg(short, long, env = "PATHWISE_CONFIG")]
    config: Option<PathBuf>,

    /// Output directory for artifacts
    #[arg(short, long, env = "PATHWISE_MODELS_DIR")]
    models_dir: Option<PathBuf>,

    /// Root folder (models default to <root>/models)
    #[arg(short, long, env = "PATHWISE_ROOT_FOLDER")]
    root_folder: Option<PathBuf>,

    /// Trees per forest
    #[arg(long)]
    n_estimators: Option<usize>,

    /// Random seed for bootstrap sampling and feature draws
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = TomlConfig::load(args.config.as_deref())?;
    let config = ResolvedConfig::resolve(
        toml_config,
        ConfigOverrides {
            root_folder: args.root_folder,
            models_dir: args.models_dir,
            port: None,
        },
    );

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .init();

    let mut params = ForestParams::from(&config.training);
    if let Some(n) = args.n_estimators {
        params.n_estimators = n;
    }
    if let Some(seed) = args.seed {
        params.seed = seed;
    }
    info!("Training with {:?}", params);

    let report = train_from_csv(&args.data, &config.models_dir, &params)
        .with_context(|| format!("Training from {} failed", args.data.display()))?;

    info!(
        "✓ Trained on {} rows, artifacts in {}",
        report.rows,
        config.models_dir.display()
    );
    Ok(())
}
