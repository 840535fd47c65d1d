//! Haraka runtime host.
//!
//! # Flow
//!
//! ```text
//!   config.toml ──▶ RuntimeConfig ──▶ Orchestrator
//!                                         ▲
//!   services/**/adapter.toml ──▶ AdapterFactory ──▶ register_with()
//!
//!   run() ──▶ wait_for_all_ready() ──▶ [serving] ──SIGINT/SIGTERM──▶ shutdown()
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use haraka_runtime::config::{load_config_with, ConfigOverrides};
use haraka_runtime::manifest::{load_all, AdapterFactory};
use haraka_runtime::observability::init_logging;
use haraka_runtime::Orchestrator;

#[derive(Parser)]
#[command(name = "haraka")]
#[command(about = "Run service adapters declared by manifests", long_about = None)]
struct Cli {
    /// Runtime configuration file (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory searched for adapter.toml manifests.
    #[arg(short, long)]
    manifests: Option<PathBuf>,

    /// Override the readiness timeout, in seconds.
    #[arg(long)]
    readiness_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        readiness_timeout_secs: cli.readiness_timeout,
    };
    let config = load_config_with(cli.config.as_deref(), &overrides)?;

    init_logging(&config.observability.log_level);

    let manifest_root = cli
        .manifests
        .unwrap_or_else(|| PathBuf::from(&config.manifests.root));

    tracing::info!(
        variant = %config.variant,
        manifests = %manifest_root.display(),
        readiness_timeout_secs = config.readiness.timeout_secs,
        "Configuration loaded"
    );

    let orchestrator = Arc::new(Orchestrator::from_config(&config));
    let factory = AdapterFactory::with_builtins();

    if manifest_root.is_dir() {
        let adapters = load_all(&manifest_root, &factory, &orchestrator)?;
        tracing::info!(count = adapters.len(), "Adapters loaded from manifests");
    } else {
        tracing::warn!(path = %manifest_root.display(), "Manifest directory not found, no adapters loaded");
    }

    orchestrator.run(&config.docs).await?;

    let timeout = Duration::from_secs(config.readiness.timeout_secs);
    if let Err(e) = orchestrator.wait_for_all_ready(timeout).await {
        tracing::error!(error = %e, "Adapters did not become ready");
    }

    orchestrator.wait_until_destroyed().await;
    tracing::info!("Shutdown complete");
    Ok(())
}
