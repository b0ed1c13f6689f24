//! Action Executor
//!
//! Runs a parsed instruction block against the input backend inside a
//! fault boundary: any failure (unparseable block, unlisted instruction,
//! backend I/O error) comes back as `PilotError::Execution` and never
//! propagates further than the cycle that produced it. Execution is
//! best-effort and side-effecting; there is no rollback.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use super::{parse_script, Action, InputBackend};
use crate::error::PilotError;

#[derive(Clone)]
pub struct ActionExecutor {
    backend: Arc<dyn InputBackend>,
}

impl ActionExecutor {
    pub fn new(backend: Arc<dyn InputBackend>) -> Self {
        Self { backend }
    }

    /// Execute an instruction block. Empty input is a no-op success.
    pub async fn execute(&self, block: &str) -> Result<(), PilotError> {
        if block.trim().is_empty() {
            return Ok(());
        }

        let actions = parse_script(block)?;
        debug!(count = actions.len(), "executing instruction block");

        for action in &actions {
            self.apply(action)
                .await
                .map_err(|e| PilotError::execution(format!("{:#}", e)))?;
        }
        Ok(())
    }

    async fn apply(&self, action: &Action) -> anyhow::Result<()> {
        match action {
            Action::Move { dir, secs } => {
                let key = dir.key();
                self.backend.key_down(key).await?;
                sleep(Duration::from_secs_f64(*secs)).await;
                self.backend.key_up(key).await
            }
            Action::Press { key, secs } => {
                self.backend.key_down(key).await?;
                sleep(Duration::from_secs_f64(*secs)).await;
                self.backend.key_up(key).await
            }
            Action::Tap { key } => self.backend.tap_key(key).await,
            Action::Click { button, at } => {
                if let Some((x, y)) = at {
                    self.backend.move_cursor(*x, *y).await?;
                }
                self.backend.click(*button).await
            }
            Action::Cursor { x, y } => self.backend.move_cursor(*x, *y).await,
            Action::Scroll { amount } => self.backend.scroll(*amount).await,
            Action::Wait { secs } => {
                sleep(Duration::from_secs_f64(*secs)).await;
                Ok(())
            }
        }
    }
}
