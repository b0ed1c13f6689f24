//! Gamepilot - Type Definitions
//!
//! Shared types for the dual-cadence worker orchestration engine.

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

// ─── Providers ───────────────────────────────────────────────────

/// Which vision-capable completion API backs a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    #[value(name = "openai")]
    OpenAi,
    Gemini,
}

impl ProviderKind {
    /// Environment variable holding the API key for this provider.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::Anthropic => write!(f, "anthropic"),
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Gemini => write!(f, "gemini"),
        }
    }
}

// ─── Cadence & Policy ────────────────────────────────────────────

/// The pacing/purpose profile of a worker.
///
/// Reactive workers act frequently on a short horizon; strategic workers
/// act rarely and plan over days of game time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CadenceKind {
    Reactive,
    Strategic,
}

impl std::fmt::Display for CadenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CadenceKind::Reactive => write!(f, "reactive"),
            CadenceKind::Strategic => write!(f, "strategic"),
        }
    }
}

/// How cadences are assigned across the worker population.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyMode {
    /// Worker 0 is strategic; every other worker is reactive.
    Mixed,
    /// All workers reactive.
    ReactiveOnly,
    /// All workers strategic.
    StrategicOnly,
}

impl std::fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PolicyMode::Mixed => write!(f, "mixed"),
            PolicyMode::ReactiveOnly => write!(f, "reactive-only"),
            PolicyMode::StrategicOnly => write!(f, "strategic-only"),
        }
    }
}

// ─── Workers ─────────────────────────────────────────────────────

/// Everything a worker needs to run, fixed at launch.
///
/// Owned exclusively by its worker task for the worker's lifetime.
#[derive(Clone, Debug)]
pub struct WorkerSpec {
    /// Ordinal index within the worker population.
    pub index: usize,
    /// Delay before the first cycle, staggering initial API load.
    pub start_offset: Duration,
    pub cadence: CadenceKind,
    pub system_prompt: String,
    pub provider: ProviderKind,
    pub model: String,
}

// ─── Cycle Records ───────────────────────────────────────────────

/// What happened to the instruction block this cycle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// An instruction block was extracted and executed.
    Executed,
    /// No usable instruction block in the response; nothing was executed.
    ParseEmpty,
    /// The block failed to parse as instructions or failed mid-execution.
    ExecutionError(String),
}

/// One decision cycle's observable result. Created fresh each cycle and
/// used only for logging; never retained across cycles.
#[derive(Clone, Debug)]
pub struct CycleRecord {
    pub screenshot: PathBuf,
    pub prompt: String,
    pub response: String,
    pub instructions: Option<String>,
    pub latency: Duration,
    pub outcome: CycleOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_key_env_names() {
        assert_eq!(ProviderKind::Anthropic.api_key_env(), "ANTHROPIC_API_KEY");
        assert_eq!(ProviderKind::OpenAi.api_key_env(), "OPENAI_API_KEY");
        assert_eq!(ProviderKind::Gemini.api_key_env(), "GEMINI_API_KEY");
    }

    #[test]
    fn cadence_display() {
        assert_eq!(CadenceKind::Reactive.to_string(), "reactive");
        assert_eq!(CadenceKind::Strategic.to_string(), "strategic");
    }
}
