//! Cadence Assignment
//!
//! Maps a policy mode and worker index to the cadence that worker runs
//! under. In mixed mode exactly one worker (index 0) plans strategically;
//! the rest react.

use crate::types::{CadenceKind, PolicyMode};

/// Cadence for worker `index` under the given policy mode.
pub fn assign_cadence(mode: PolicyMode, index: usize) -> CadenceKind {
    match mode {
        PolicyMode::Mixed => {
            if index == 0 {
                CadenceKind::Strategic
            } else {
                CadenceKind::Reactive
            }
        }
        PolicyMode::ReactiveOnly => CadenceKind::Reactive,
        PolicyMode::StrategicOnly => CadenceKind::Strategic,
    }
}
