// src/exec/orchestrator.rs

//! Concurrent fan-out / fan-in over a list of invocations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::command::CommandSpec;
use crate::config::DumpTool;
use crate::errors::{DumpError, Result};

use super::backend::{CapturedOutput, DumpBackend, Invocation};

/// Run every command concurrently and return their outputs in command order.
///
/// All invocations are started before any is awaited. Each result is stored
/// in the slot of its launch index, so the returned order never depends on
/// which process finished first.
///
/// This is an all-or-nothing join: if any invocation fails, the remaining
/// ones still run to completion (their results are dropped) and the first
/// failure observed is returned.
pub async fn run_all<B>(
    backend: Arc<B>,
    tool: &DumpTool,
    specs: Vec<CommandSpec>,
    timeout: Option<Duration>,
) -> Result<Vec<CapturedOutput>>
where
    B: DumpBackend + 'static,
{
    let total = specs.len();
    let mut set = JoinSet::new();

    for (index, spec) in specs.into_iter().enumerate() {
        let backend = Arc::clone(&backend);
        let invocation = Invocation {
            index,
            tool: tool.clone(),
            spec,
            timeout,
        };
        set.spawn(async move { (index, run_one(backend.as_ref(), invocation).await) });
    }

    info!(invocations = total, "all dump invocations launched");

    let mut slots: Vec<Option<CapturedOutput>> = vec![None; total];
    let mut first_error: Option<DumpError> = None;

    while let Some(joined) = set.join_next().await {
        let (index, result) = match joined {
            Ok(pair) => pair,
            Err(join_err) => {
                warn!(error = %join_err, "dump task did not complete");
                first_error.get_or_insert(DumpError::Other(anyhow!(
                    "dump task did not complete: {join_err}"
                )));
                continue;
            }
        };

        match result {
            Ok(output) => {
                debug!(index, bytes = output.stdout.len(), "invocation succeeded");
                slots[index] = Some(output);
            }
            Err(err) => {
                warn!(index, error = %err, "invocation failed");
                first_error.get_or_insert(err);
            }
        }
    }

    if let Some(err) = first_error {
        return Err(err);
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(index, slot)| {
            slot.ok_or_else(|| {
                DumpError::Other(anyhow!("no output recorded for invocation #{index}"))
            })
        })
        .collect()
}

async fn run_one<B>(backend: &B, invocation: Invocation) -> Result<CapturedOutput>
where
    B: DumpBackend + ?Sized,
{
    let Some(after) = invocation.timeout else {
        return backend.run(invocation).await;
    };

    let command = invocation.spec.redacted();
    // Dropping the backend future on expiry kills the child (kill_on_drop).
    match tokio::time::timeout(after, backend.run(invocation)).await {
        Ok(result) => result,
        Err(_) => Err(DumpError::Timeout { command, after }),
    }
}
