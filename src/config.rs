//! Run Configuration
//!
//! The orchestrator's read-only configuration: provider/model selection,
//! the latency/interval pair that sizes the worker population, cadence
//! policy mode, and pacing tunables. Validated once before any worker
//! launches; immutable afterwards.

use std::path::PathBuf;
use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PilotError;
use crate::types::{CadenceKind, PolicyMode, ProviderKind};

/// Pacing tunables per cadence, in seconds.
///
/// The reactive pace is fixed and long relative to typical model latency to
/// bound API call volume. The strategic pace is a uniform random draw from
/// a much wider, slower window.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pacing {
    pub reactive_pace_secs: f64,
    pub strategic_pace_min_secs: f64,
    pub strategic_pace_max_secs: f64,
    /// Applied after a failed cycle before the next attempt.
    pub error_backoff_secs: f64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            reactive_pace_secs: 35.0,
            strategic_pace_min_secs: 80.0,
            strategic_pace_max_secs: 100.0,
            error_backoff_secs: 1.0,
        }
    }
}

impl Pacing {
    /// Post-cycle delay for the given cadence.
    pub fn delay(&self, cadence: CadenceKind) -> Duration {
        match cadence {
            CadenceKind::Reactive => Duration::from_secs_f64(self.reactive_pace_secs),
            CadenceKind::Strategic => {
                let secs = if self.strategic_pace_max_secs > self.strategic_pace_min_secs {
                    rand::thread_rng()
                        .gen_range(self.strategic_pace_min_secs..self.strategic_pace_max_secs)
                } else {
                    self.strategic_pace_min_secs
                };
                Duration::from_secs_f64(secs)
            }
        }
    }

    pub fn error_backoff(&self) -> Duration {
        Duration::from_secs_f64(self.error_backoff_secs)
    }
}

/// Read-only configuration for one orchestrator run.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunConfig {
    pub provider: ProviderKind,
    pub model: String,
    /// Seconds between worker start offsets. Must be > 0.
    pub concurrency_interval_secs: f64,
    /// Estimated completion-call latency in seconds. Must be >= 0.
    pub latency_estimate_secs: f64,
    pub policy: PolicyMode,
    pub pacing: Pacing,
    /// Root directory for capture artifacts and response logs.
    pub cache_dir: PathBuf,
    /// Tag grouping this run's artifacts under the cache directory.
    pub session: String,
}

impl RunConfig {
    /// Validate the latency/interval/pacing combination.
    ///
    /// A violation here is fatal and aborts startup before any worker
    /// launches.
    pub fn validate(&self) -> Result<(), PilotError> {
        if !self.concurrency_interval_secs.is_finite() || self.concurrency_interval_secs <= 0.0 {
            return Err(PilotError::config(format!(
                "concurrency interval must be > 0 (got {})",
                self.concurrency_interval_secs
            )));
        }
        if !self.latency_estimate_secs.is_finite() || self.latency_estimate_secs < 0.0 {
            return Err(PilotError::config(format!(
                "latency estimate must be >= 0 (got {})",
                self.latency_estimate_secs
            )));
        }
        let p = &self.pacing;
        for (name, v) in [
            ("reactive pace", p.reactive_pace_secs),
            ("strategic pace min", p.strategic_pace_min_secs),
            ("strategic pace max", p.strategic_pace_max_secs),
            ("error backoff", p.error_backoff_secs),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(PilotError::config(format!(
                    "{} must be >= 0 (got {})",
                    name, v
                )));
            }
        }
        if p.strategic_pace_min_secs > p.strategic_pace_max_secs {
            return Err(PilotError::config(
                "strategic pace window is inverted (min > max)",
            ));
        }
        if self.model.is_empty() {
            return Err(PilotError::config("model identity must not be empty"));
        }
        Ok(())
    }

    /// Worker population size: `max(2, ceil(latency / interval))`.
    ///
    /// Always at least 2, so one worker is in flight relative to the
    /// other's pacing even when the interval exceeds the latency estimate.
    pub fn worker_count(&self) -> usize {
        let derived = (self.latency_estimate_secs / self.concurrency_interval_secs).ceil();
        (derived as usize).max(2)
    }

    /// Start offset for each worker: `i * interval`.
    pub fn offsets(&self) -> Vec<Duration> {
        (0..self.worker_count())
            .map(|i| Duration::from_secs_f64(i as f64 * self.concurrency_interval_secs))
            .collect()
    }

    /// Root directory for this run's artifacts: `<cache_dir>/<session>`.
    pub fn session_dir(&self) -> PathBuf {
        self.cache_dir.join(&self.session)
    }
}

/// Default cache root: the platform cache directory, falling back to a
/// local `cache/` folder.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|d| d.join("gamepilot"))
        .unwrap_or_else(|| PathBuf::from("cache"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(interval: f64, latency: f64) -> RunConfig {
        RunConfig {
            provider: ProviderKind::Anthropic,
            model: "claude-3-7-sonnet-20250219".to_string(),
            concurrency_interval_secs: interval,
            latency_estimate_secs: latency,
            policy: PolicyMode::Mixed,
            pacing: Pacing::default(),
            cache_dir: PathBuf::from("cache"),
            session: "test".to_string(),
        }
    }

    #[test]
    fn worker_count_matches_formula() {
        assert_eq!(config(1.0, 8.0).worker_count(), 8);
        assert_eq!(config(2.0, 5.0).worker_count(), 3); // ceil(2.5)
        assert_eq!(config(0.5, 8.0).worker_count(), 16);
    }

    #[test]
    fn worker_count_floor_is_two() {
        // Degenerate configurations still launch a pair of workers.
        assert_eq!(config(1.0, 0.0).worker_count(), 2);
        assert_eq!(config(10.0, 8.0).worker_count(), 2);
        assert_eq!(config(1.0, 1.0).worker_count(), 2);
    }

    #[test]
    fn offsets_are_strictly_increasing_multiples() {
        let cfg = config(1.0, 8.0);
        let offsets = cfg.offsets();
        assert_eq!(offsets.len(), 8);
        assert_eq!(offsets[0], Duration::ZERO);
        for (i, off) in offsets.iter().enumerate() {
            assert_eq!(*off, Duration::from_secs_f64(i as f64));
        }
        for pair in offsets.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn zero_or_negative_interval_is_rejected() {
        assert!(config(0.0, 8.0).validate().is_err());
        assert!(config(-1.0, 8.0).validate().is_err());
    }

    #[test]
    fn negative_latency_is_rejected() {
        assert!(config(1.0, -0.1).validate().is_err());
    }

    #[test]
    fn valid_config_passes() {
        assert!(config(1.0, 8.0).validate().is_ok());
        assert!(config(1.0, 0.0).validate().is_ok());
    }

    #[test]
    fn inverted_strategic_window_is_rejected() {
        let mut cfg = config(1.0, 8.0);
        cfg.pacing.strategic_pace_min_secs = 100.0;
        cfg.pacing.strategic_pace_max_secs = 80.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn reactive_delay_is_fixed() {
        let pacing = Pacing::default();
        let d = pacing.delay(CadenceKind::Reactive);
        assert_eq!(d, Duration::from_secs_f64(35.0));
    }

    #[test]
    fn strategic_delay_stays_in_window() {
        let pacing = Pacing::default();
        for _ in 0..50 {
            let d = pacing.delay(CadenceKind::Strategic).as_secs_f64();
            assert!((80.0..100.0).contains(&d), "delay {} out of window", d);
        }
    }

    #[test]
    fn degenerate_strategic_window_uses_min() {
        let pacing = Pacing {
            strategic_pace_min_secs: 42.0,
            strategic_pace_max_secs: 42.0,
            ..Pacing::default()
        };
        let d = pacing.delay(CadenceKind::Strategic);
        assert_eq!(d, Duration::from_secs_f64(42.0));
    }
}
