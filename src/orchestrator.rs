//! Orchestrator
//!
//! Sizes the worker population from the latency/interval pair, launches
//! one task per worker with staggered start offsets, and supervises them
//! until cancellation. Workers that die are logged, not restarted: the
//! run operates on an at-least-one-worker-survives, best-effort model.
//!
//! Known race, accepted by design: workers share the physical screen and
//! input device with no mutual exclusion, so two workers can issue input
//! in the same real-time window in an interleaved, unordered fashion. A
//! serializing dispatcher around the input backend would be the extension
//! point if that ever needs to change.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::actions::{ActionExecutor, InputBackend};
use crate::config::RunConfig;
use crate::error::PilotError;
use crate::providers::CompletionProvider;
use crate::screen::ScreenCapture;
use crate::types::WorkerSpec;
use crate::worker::{assign_cadence, prompts, run_worker, CycleContext};

pub struct Orchestrator {
    config: RunConfig,
    provider: Arc<dyn CompletionProvider>,
    capture: Arc<dyn ScreenCapture>,
    input: Arc<dyn InputBackend>,
}

impl Orchestrator {
    /// Validate the configuration and assemble the orchestrator.
    ///
    /// Fails with `PilotError::Config` before any worker launches.
    pub fn new(
        config: RunConfig,
        provider: Arc<dyn CompletionProvider>,
        capture: Arc<dyn ScreenCapture>,
        input: Arc<dyn InputBackend>,
    ) -> Result<Self, PilotError> {
        config.validate()?;
        Ok(Self {
            config,
            provider,
            capture,
            input,
        })
    }

    /// The immutable launch plan: one spec per worker, with offsets and
    /// cadences derived from the configuration.
    pub fn worker_specs(&self) -> Vec<WorkerSpec> {
        self.config
            .offsets()
            .into_iter()
            .enumerate()
            .map(|(index, start_offset)| WorkerSpec {
                index,
                start_offset,
                cadence: assign_cadence(self.config.policy, index),
                system_prompt: prompts::SYSTEM_PROMPT.to_string(),
                provider: self.config.provider,
                model: self.config.model.clone(),
            })
            .collect()
    }

    /// Launch all workers and supervise until the token is cancelled,
    /// then wait for every worker to wind down.
    pub async fn run(&self, cancel: CancellationToken) {
        let specs = self.worker_specs();
        info!(
            workers = specs.len(),
            policy = ?self.config.policy,
            provider = self.provider.name(),
            model = %self.config.model,
            session = %self.config.session,
            "launching workers"
        );

        let session_dir = self.config.session_dir();
        let mut handles = Vec::with_capacity(specs.len());
        for spec in specs {
            let ctx = CycleContext {
                provider: Arc::clone(&self.provider),
                capture: Arc::clone(&self.capture),
                executor: ActionExecutor::new(Arc::clone(&self.input)),
                session_dir: session_dir.clone(),
            };
            handles.push(tokio::spawn(run_worker(
                spec,
                ctx,
                self.config.pacing.clone(),
                cancel.clone(),
            )));
        }

        // Supervising wait. Workers run forever; only cancellation ends
        // the run.
        cancel.cancelled().await;
        info!("cancellation received, stopping workers");

        for (index, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                warn!(worker = index, error = %e, "worker task did not shut down cleanly");
            }
        }
        info!("all workers stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::RecordingBackend;
    use crate::config::Pacing;
    use crate::screen::NullCapture;
    use crate::types::{CadenceKind, PolicyMode, ProviderKind};
    use crate::worker::testutil::StaticProvider;
    use std::time::Duration;

    fn config(interval: f64, latency: f64, policy: PolicyMode) -> RunConfig {
        RunConfig {
            provider: ProviderKind::Anthropic,
            model: "test-model".to_string(),
            concurrency_interval_secs: interval,
            latency_estimate_secs: latency,
            policy,
            pacing: Pacing {
                reactive_pace_secs: 0.001,
                strategic_pace_min_secs: 0.001,
                strategic_pace_max_secs: 0.002,
                error_backoff_secs: 0.001,
            },
            cache_dir: std::env::temp_dir(),
            session: "orchestrator-test".to_string(),
        }
    }

    fn orchestrator(cfg: RunConfig, dir: &tempfile::TempDir) -> Result<Orchestrator, PilotError> {
        Orchestrator::new(
            cfg,
            StaticProvider::new("no instructions"),
            Arc::new(NullCapture::new(dir.path().to_path_buf())),
            Arc::new(RecordingBackend::new()),
        )
    }

    #[test]
    fn mixed_run_plan_matches_the_formula() {
        // interval=1.0, latency=8.0 -> 8 workers at offsets 0..=7, worker 0
        // strategic and the rest reactive.
        let dir = tempfile::tempdir().unwrap();
        let orch = orchestrator(config(1.0, 8.0, PolicyMode::Mixed), &dir).unwrap();

        let specs = orch.worker_specs();
        assert_eq!(specs.len(), 8);
        for (i, spec) in specs.iter().enumerate() {
            assert_eq!(spec.index, i);
            assert_eq!(spec.start_offset, Duration::from_secs_f64(i as f64));
            let expected = if i == 0 {
                CadenceKind::Strategic
            } else {
                CadenceKind::Reactive
            };
            assert_eq!(spec.cadence, expected, "worker {}", i);
        }
    }

    #[test]
    fn single_cadence_modes_cover_all_workers() {
        let dir = tempfile::tempdir().unwrap();

        let orch = orchestrator(config(1.0, 4.0, PolicyMode::ReactiveOnly), &dir).unwrap();
        assert!(orch
            .worker_specs()
            .iter()
            .all(|s| s.cadence == CadenceKind::Reactive));

        let orch = orchestrator(config(1.0, 4.0, PolicyMode::StrategicOnly), &dir).unwrap();
        assert!(orch
            .worker_specs()
            .iter()
            .all(|s| s.cadence == CadenceKind::Strategic));
    }

    #[test]
    fn invalid_interval_aborts_before_launch() {
        let dir = tempfile::tempdir().unwrap();
        let err = orchestrator(config(0.0, 8.0, PolicyMode::Mixed), &dir);
        assert!(matches!(err, Err(PilotError::Config(_))));
    }

    #[tokio::test]
    async fn run_exits_when_cancelled() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = config(0.05, 0.1, PolicyMode::Mixed);
        cfg.cache_dir = dir.path().to_path_buf();
        let provider = StaticProvider::new("```\ntap e\n```");
        let orch = Orchestrator::new(
            cfg,
            provider.clone(),
            Arc::new(NullCapture::new(dir.path().to_path_buf())),
            Arc::new(RecordingBackend::new()),
        )
        .unwrap();

        let cancel = CancellationToken::new();
        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            canceller.cancel();
        });

        tokio::time::timeout(Duration::from_secs(5), orch.run(cancel))
            .await
            .expect("orchestrator did not stop after cancellation");

        // Both workers had time to clear their offsets and cycle.
        assert!(provider.calls() >= 2, "only {} cycles ran", provider.calls());
    }
}
