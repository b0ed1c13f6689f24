//! Error taxonomy for the orchestration engine.
//!
//! Only `Config` is fatal, and only before any worker launches. Everything
//! else is scoped to a single decision cycle and contained by the owning
//! worker's loop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PilotError {
    /// Invalid run configuration. Raised before launch; aborts startup.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Screen capture failed for this cycle.
    #[error("screen capture failed: {0}")]
    Capture(String),

    /// The completion call failed, timed out, or returned unusable content.
    #[error("completion provider error: {0}")]
    Provider(String),

    /// The instruction block could not be parsed or executed.
    #[error("instruction execution failed: {0}")]
    Execution(String),
}

impl PilotError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }
}
