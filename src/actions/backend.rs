//! Input Backend
//!
//! The capability seam between the action executor and the machine's real
//! keyboard/mouse. Workers share one backend instance; access to the
//! device is deliberately uncoordinated (see the orchestrator docs).

use std::sync::Mutex;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::process::Command;

use super::MouseButton;

/// Delivers input events to the desktop the game is running on.
#[async_trait]
pub trait InputBackend: Send + Sync {
    async fn key_down(&self, key: &str) -> Result<()>;
    async fn key_up(&self, key: &str) -> Result<()>;
    async fn tap_key(&self, key: &str) -> Result<()>;
    async fn click(&self, button: MouseButton) -> Result<()>;
    async fn move_cursor(&self, x: i32, y: i32) -> Result<()>;
    async fn scroll(&self, amount: i32) -> Result<()>;
}

// ─── xdotool ─────────────────────────────────────────────────────

/// Real input via the `xdotool` command-line tool.
#[derive(Debug, Default)]
pub struct XdotoolBackend;

impl XdotoolBackend {
    pub fn new() -> Self {
        Self
    }

    async fn run(&self, args: &[&str]) -> Result<()> {
        let output = Command::new("xdotool")
            .args(args)
            .output()
            .await
            .context("failed to spawn xdotool")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "xdotool {} exited with {}: {}",
                args.first().unwrap_or(&""),
                output.status,
                stderr.trim()
            );
        }
        Ok(())
    }
}

#[async_trait]
impl InputBackend for XdotoolBackend {
    async fn key_down(&self, key: &str) -> Result<()> {
        self.run(&["keydown", key]).await
    }

    async fn key_up(&self, key: &str) -> Result<()> {
        self.run(&["keyup", key]).await
    }

    async fn tap_key(&self, key: &str) -> Result<()> {
        self.run(&["key", key]).await
    }

    async fn click(&self, button: MouseButton) -> Result<()> {
        let button = match button {
            MouseButton::Left => "1",
            MouseButton::Right => "3",
        };
        self.run(&["click", button]).await
    }

    async fn move_cursor(&self, x: i32, y: i32) -> Result<()> {
        self.run(&["mousemove", &x.to_string(), &y.to_string()]).await
    }

    async fn scroll(&self, amount: i32) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        // X11 convention: button 4 scrolls up, button 5 scrolls down.
        let button = if amount > 0 { "4" } else { "5" };
        let repeat = amount.unsigned_abs().to_string();
        self.run(&["click", "--repeat", &repeat, button]).await
    }
}

// ─── Recording (dry runs and tests) ──────────────────────────────

/// Records every event instead of touching the device. Backs `--dry-run`
/// and the test suite; can be constructed failing to exercise the
/// executor's fault boundary.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    events: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose every call fails, as a stand-in for a broken device.
    pub fn failing() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Snapshot of the events recorded so far, in order.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("events lock").clone()
    }

    fn record(&self, event: String) -> Result<()> {
        if self.fail {
            bail!("input device unavailable");
        }
        tracing::debug!(event = %event, "input event");
        self.events.lock().expect("events lock").push(event);
        Ok(())
    }
}

#[async_trait]
impl InputBackend for RecordingBackend {
    async fn key_down(&self, key: &str) -> Result<()> {
        self.record(format!("keydown {}", key))
    }

    async fn key_up(&self, key: &str) -> Result<()> {
        self.record(format!("keyup {}", key))
    }

    async fn tap_key(&self, key: &str) -> Result<()> {
        self.record(format!("tap {}", key))
    }

    async fn click(&self, button: MouseButton) -> Result<()> {
        self.record(format!("click {:?}", button))
    }

    async fn move_cursor(&self, x: i32, y: i32) -> Result<()> {
        self.record(format!("cursor {} {}", x, y))
    }

    async fn scroll(&self, amount: i32) -> Result<()> {
        self.record(format!("scroll {}", amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn recording_backend_keeps_event_order() {
        let backend = RecordingBackend::new();
        backend.key_down("w").await.unwrap();
        backend.key_up("w").await.unwrap();
        backend.click(MouseButton::Left).await.unwrap();
        assert_eq!(backend.events(), vec!["keydown w", "keyup w", "click Left"]);
    }

    #[tokio::test]
    async fn failing_backend_errors_without_recording() {
        let backend = RecordingBackend::failing();
        assert!(backend.tap_key("e").await.is_err());
        assert!(backend.events().is_empty());
    }
}
