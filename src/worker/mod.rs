//! Workers
//!
//! A worker is a long-running loop over its decision cycle: sleep out the
//! stagger offset, then capture/complete/execute forever under the
//! cadence's pacing. Per-cycle errors are contained here -- logged, backed
//! off, and retried. Cancellation is the only way out of the loop, and
//! every sleep races it so shutdown is prompt.

pub mod cadence;
pub mod cycle;
pub mod prompts;

pub use cadence::assign_cadence;
pub use cycle::{run_cycle, CycleContext};

use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Pacing;
use crate::types::{CycleOutcome, WorkerSpec};

/// Run a worker until the token is cancelled. Never returns early for
/// any other reason.
pub async fn run_worker(
    spec: WorkerSpec,
    ctx: CycleContext,
    pacing: Pacing,
    cancel: CancellationToken,
) {
    info!(
        worker = spec.index,
        cadence = %spec.cadence,
        provider = %spec.provider,
        model = %spec.model,
        offset_secs = spec.start_offset.as_secs_f64(),
        "worker pending"
    );

    // Stagger offset spreads the initial burst of API calls.
    if !pause(&cancel, spec.start_offset).await {
        info!(worker = spec.index, "worker cancelled before first cycle");
        return;
    }
    info!(worker = spec.index, cadence = %spec.cadence, "worker active");

    loop {
        if cancel.is_cancelled() {
            break;
        }

        let failed = match run_cycle(&spec, &ctx).await {
            Ok(record) => match &record.outcome {
                CycleOutcome::Executed => {
                    info!(
                        worker = spec.index,
                        latency_secs = record.latency.as_secs_f64(),
                        "cycle executed"
                    );
                    false
                }
                CycleOutcome::ParseEmpty => {
                    info!(
                        worker = spec.index,
                        latency_secs = record.latency.as_secs_f64(),
                        "no action this cycle"
                    );
                    false
                }
                CycleOutcome::ExecutionError(msg) => {
                    warn!(worker = spec.index, error = %msg, "instruction execution failed");
                    true
                }
            },
            Err(e) => {
                warn!(worker = spec.index, error = %e, "cycle failed");
                true
            }
        };

        if failed && !pause(&cancel, pacing.error_backoff()).await {
            break;
        }
        if !pause(&cancel, pacing.delay(spec.cadence)).await {
            break;
        }
    }

    info!(worker = spec.index, "worker stopped");
}

/// Sleep that races cancellation. Returns `false` if the token fired.
async fn pause(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = sleep(duration) => true,
    }
}

// ─── Test doubles ────────────────────────────────────────────────
