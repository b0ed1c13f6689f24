//! Decision Cycle
//!
//! One pass over capture -> prompt -> complete -> parse -> execute,
//! producing a `CycleRecord` for observability. The record never feeds
//! back into control flow; the worker only looks at whether the cycle
//! failed when deciding how to pace.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::actions::ActionExecutor;
use crate::error::PilotError;
use crate::output::log_response;
use crate::parser::extract_instruction_block;
use crate::providers::CompletionProvider;
use crate::screen::{encode_image, ScreenCapture};
use crate::types::{CadenceKind, CycleOutcome, CycleRecord, WorkerSpec};

use super::prompts::cycle_prompt;

/// Strategic responses are mostly analysis; a block at or under this
/// length is treated as "nothing to execute", not an error.
const MIN_STRATEGIC_BLOCK_LEN: usize = 10;

/// The capabilities a worker's cycles run against. Shared-device
/// capabilities (screen, input) are the same instances across all
/// workers; access to them is uncoordinated.
#[derive(Clone)]
pub struct CycleContext {
    pub provider: Arc<dyn CompletionProvider>,
    pub capture: Arc<dyn ScreenCapture>,
    pub executor: ActionExecutor,
    pub session_dir: PathBuf,
}

/// Run one decision cycle for the worker.
///
/// Capture or provider failures abort the cycle with an error; an
/// execution failure is recorded in the outcome instead, since by then
/// the response is worth logging.
pub async fn run_cycle(spec: &WorkerSpec, ctx: &CycleContext) -> Result<CycleRecord, PilotError> {
    let screenshot = ctx
        .capture
        .capture(spec.index)
        .await
        .map_err(|e| PilotError::Capture(format!("{:#}", e)))?;

    let image_b64 = encode_image(&screenshot)
        .await
        .map_err(|e| PilotError::Capture(format!("{:#}", e)))?;

    let prompt = cycle_prompt(spec.cadence);

    let started = Instant::now();
    let response = ctx
        .provider
        .complete(&spec.system_prompt, prompt, &image_b64)
        .await
        .map_err(|e| PilotError::Provider(format!("{:#}", e)))?;
    let latency = started.elapsed();

    debug!(
        worker = spec.index,
        latency_secs = latency.as_secs_f64(),
        "completion received"
    );

    log_response(&ctx.session_dir, spec.index, &response);

    let instructions = extract_instruction_block(&response);

    let outcome = match instructions.as_deref() {
        None => CycleOutcome::ParseEmpty,
        Some(block)
            if spec.cadence == CadenceKind::Strategic && block.len() <= MIN_STRATEGIC_BLOCK_LEN =>
        {
            CycleOutcome::ParseEmpty
        }
        Some(block) => match ctx.executor.execute(block).await {
            Ok(()) => CycleOutcome::Executed,
            Err(e) => CycleOutcome::ExecutionError(e.to_string()),
        },
    };

    Ok(CycleRecord {
        screenshot,
        prompt: prompt.to_string(),
        response,
        instructions,
        latency,
        outcome,
    })
}
