//! Gamepilot Runtime
//!
//! The entry point: CLI args, capability wiring, and orchestrating the
//! worker population until the process is interrupted.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tokio::signal;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use gamepilot::actions::{InputBackend, RecordingBackend, XdotoolBackend};
use gamepilot::config::{default_cache_dir, Pacing, RunConfig};
use gamepilot::orchestrator::Orchestrator;
use gamepilot::providers::create_provider;
use gamepilot::screen::{CommandCapture, NullCapture, ScreenCapture};
use gamepilot::types::{PolicyMode, ProviderKind};

/// Gamepilot -- drive a desktop game with a vision model
#[derive(Parser, Debug)]
#[command(
    name = "gamepilot",
    version,
    about = "Drive a desktop game with a vision-capable language model"
)]
struct Cli {
    /// Completion API to use
    #[arg(long, value_enum, default_value_t = ProviderKind::Anthropic)]
    provider: ProviderKind,

    /// Model identity (must have vision capabilities)
    #[arg(long, default_value = "claude-3-7-sonnet-20250219")]
    model: String,

    /// Seconds between worker start offsets
    #[arg(long, default_value_t = 1.0)]
    concurrency_interval: f64,

    /// Estimated completion-call latency in seconds
    #[arg(long, default_value_t = 8.0)]
    latency_estimate: f64,

    /// How cadences are assigned across workers
    #[arg(long, value_enum, default_value_t = PolicyMode::Mixed)]
    policy: PolicyMode,

    /// Root directory for capture artifacts and response logs
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Record input events instead of sending them; skip real capture
    #[arg(long)]
    dry_run: bool,

    /// Path to the game executable
    #[arg(long)]
    game_path: Option<PathBuf>,

    /// Launch the game and wait for it before starting workers
    #[arg(long)]
    auto_launch: bool,
}

// ─── Bootstrap ───────────────────────────────────────────────────

/// Spawn the game binary and give it time to reach an interactive state.
async fn launch_game(path: &Path) -> Result<()> {
    info!(game = %path.display(), "launching game");
    tokio::process::Command::new(path)
        .spawn()
        .with_context(|| format!("failed to launch game at {}", path.display()))?;
    sleep(Duration::from_secs(10)).await;
    Ok(())
}

/// Waits for SIGINT (and SIGTERM on unix) and trips the token.
async fn watch_for_shutdown(cancel: CancellationToken) {
    let ctrl_c = signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");

        tokio::select! {
            _ = ctrl_c => info!("received SIGINT, shutting down"),
            _ = sigterm.recv() => info!("received SIGTERM, shutting down"),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.expect("failed to register Ctrl+C handler");
        info!("received shutdown signal");
    }

    cancel.cancel();
}

async fn run(cli: Cli) -> Result<()> {
    let session = format!(
        "{}-{}",
        Local::now().format("%Y%m%d_%H%M%S"),
        &uuid::Uuid::new_v4().to_string()[..8]
    );

    let config = RunConfig {
        provider: cli.provider,
        model: cli.model,
        concurrency_interval_secs: cli.concurrency_interval,
        latency_estimate_secs: cli.latency_estimate,
        policy: cli.policy,
        pacing: Pacing::default(),
        cache_dir: cli.cache_dir.unwrap_or_else(default_cache_dir),
        session,
    };

    if cli.auto_launch {
        match &cli.game_path {
            Some(path) if path.exists() => launch_game(path).await?,
            Some(path) => warn!(
                game = %path.display(),
                "game path does not exist; start the game manually"
            ),
            None => warn!("--auto-launch given without --game-path; start the game manually"),
        }
    }

    let provider = create_provider(config.provider, &config.model)?;

    let session_dir = config.session_dir();
    let (capture, input): (Arc<dyn ScreenCapture>, Arc<dyn InputBackend>) = if cli.dry_run {
        info!("dry run: input events will be recorded, not sent");
        (
            Arc::new(NullCapture::new(session_dir)),
            Arc::new(RecordingBackend::new()),
        )
    } else {
        (
            Arc::new(CommandCapture::new(session_dir)),
            Arc::new(XdotoolBackend::new()),
        )
    };

    let orchestrator = Orchestrator::new(config, provider, capture, input)?;

    let cancel = CancellationToken::new();
    tokio::spawn(watch_for_shutdown(cancel.clone()));

    orchestrator.run(cancel).await;
    info!("run finished");
    Ok(())
}

// ─── Entry Point ─────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gamepilot=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Fatal: {:#}", e);
        std::process::exit(1);
    }
}
