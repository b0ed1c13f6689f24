//! Response Audit Log
//!
//! Persists every raw model response per worker so a run can be audited
//! after the fact. Strictly fire-and-forget: a cycle must never fail
//! because its audit write did.

use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::Path;

use chrono::Local;
use tracing::warn;

const LOG_FILENAME: &str = "responses.log";

/// Append a raw model response to the worker's audit log under the
/// session directory. Failures are logged and swallowed.
pub fn log_response(session_dir: &Path, worker_id: usize, response: &str) {
    let dir = session_dir.join(format!("worker_{}", worker_id));
    if let Err(e) = fs::create_dir_all(&dir) {
        warn!(worker = worker_id, error = %e, "audit log dir creation failed");
        return;
    }

    let path = dir.join(LOG_FILENAME);
    let entry = format!(
        "=== {} ===\n{}\n\n",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        response.trim_end()
    );

    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| f.write_all(entry.as_bytes()));

    if let Err(e) = result {
        warn!(worker = worker_id, error = %e, "audit log append failed");
    }
}
