//! Screen Capture
//!
//! The capability that produces one screenshot artifact per decision
//! cycle. Artifacts land under `<session_dir>/worker_<id>/` with a
//! timestamped name so a run can be audited frame by frame.
//!
//! Capture shells out to the platform screenshot tool rather than linking
//! a capture library: `screencapture` on macOS, `scrot` elsewhere.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::Local;
use tokio::process::Command;

/// Produces a full-screen capture artifact for a worker's cycle.
#[async_trait]
pub trait ScreenCapture: Send + Sync {
    async fn capture(&self, worker_id: usize) -> Result<PathBuf>;
}

/// Serialize a capture artifact for transmission to a completion provider.
pub async fn encode_image(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read capture artifact {}", path.display()))?;
    Ok(STANDARD.encode(bytes))
}

fn artifact_path(root: &Path, worker_id: usize) -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S_%3f");
    root.join(format!("worker_{}", worker_id))
        .join(format!("screenshot_{}.png", stamp))
}

// ─── Command backend ─────────────────────────────────────────────

/// Real capture via the platform screenshot command.
#[derive(Debug)]
pub struct CommandCapture {
    root: PathBuf,
}

impl CommandCapture {
    /// `root` is the session directory artifacts are grouped under.
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl ScreenCapture for CommandCapture {
    async fn capture(&self, worker_id: usize) -> Result<PathBuf> {
        let path = artifact_path(&self.root, worker_id);
        let dir = path.parent().expect("artifact path has a parent");
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create capture dir {}", dir.display()))?;

        let output = capture_command(&path)
            .output()
            .await
            .context("failed to spawn screenshot tool")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "screenshot tool exited with {}: {}",
                output.status,
                stderr.trim()
            );
        }
        if !path.exists() {
            bail!("screenshot tool produced no file at {}", path.display());
        }
        Ok(path)
    }
}

#[cfg(target_os = "macos")]
fn capture_command(path: &Path) -> Command {
    let mut cmd = Command::new("screencapture");
    cmd.arg("-x").arg(path);
    cmd
}

#[cfg(not(target_os = "macos"))]
fn capture_command(path: &Path) -> Command {
    let mut cmd = Command::new("scrot");
    cmd.arg("--overwrite").arg(path);
    cmd
}

// ─── Null backend ────────────────────────────────────────────────

/// Smallest valid PNG (1x1 transparent pixel), for dry runs and tests.
const PNG_1X1: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Writes a placeholder artifact instead of touching the screen. Backs
/// `--dry-run` and the test suite.
#[derive(Debug)]
pub struct NullCapture {
    root: PathBuf,
}

impl NullCapture {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl ScreenCapture for NullCapture {
    async fn capture(&self, worker_id: usize) -> Result<PathBuf> {
        let path = artifact_path(&self.root, worker_id);
        let dir = path.parent().expect("artifact path has a parent");
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("failed to create capture dir {}", dir.display()))?;
        tokio::fs::write(&path, PNG_1X1)
            .await
            .with_context(|| format!("failed to write placeholder capture {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_capture_writes_per_worker_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let capture = NullCapture::new(dir.path().to_path_buf());

        let a = capture.capture(0).await.unwrap();
        let b = capture.capture(3).await.unwrap();

        assert!(a.starts_with(dir.path().join("worker_0")));
        assert!(b.starts_with(dir.path().join("worker_3")));
        assert_eq!(tokio::fs::read(&a).await.unwrap(), PNG_1X1.to_vec());
    }

    #[tokio::test]
    async fn encode_produces_decodable_base64() {
        let dir = tempfile::tempdir().unwrap();
        let capture = NullCapture::new(dir.path().to_path_buf());
        let path = capture.capture(1).await.unwrap();

        let encoded = encode_image(&path).await.unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        assert_eq!(decoded, PNG_1X1.to_vec());
    }

    #[tokio::test]
    async fn encode_missing_file_errors() {
        assert!(encode_image(Path::new("/nonexistent/shot.png")).await.is_err());
    }
}
