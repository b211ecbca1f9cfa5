// src/exec/process.rs

//! Dump tool process runner.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info};

use crate::command::scrub_password;
use crate::errors::{DumpError, Result};

use super::backend::{CapturedOutput, DumpBackend, Invocation};

/// Production backend: runs the dump tool as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessBackend;

impl DumpBackend for ProcessBackend {
    fn run(
        &self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<CapturedOutput>> + Send + '_>> {
        Box::pin(run_process(invocation))
    }
}

/// Spawn one invocation and collect its output.
///
/// Arguments go to the program as a list, never through a shell, so filter
/// expressions with spaces or quotes arrive unchanged. stdout and stderr are
/// drained concurrently with waiting on the child so neither pipe can fill
/// up and stall it.
pub async fn run_process(invocation: Invocation) -> Result<CapturedOutput> {
    let Invocation {
        index, tool, spec, ..
    } = invocation;
    let command_line = spec.redacted();

    info!(
        index,
        target = %spec.target,
        program = %tool.program,
        command = %command_line,
        "starting dump process"
    );

    let mut cmd = Command::new(&tool.program);
    cmd.args(&tool.args)
        .args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| DumpError::Spawn {
        program: tool.program.clone(),
        source,
    })?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (status, stdout, stderr) =
        tokio::try_join!(child.wait(), drain(stdout), drain(stderr))?;

    let stderr = scrub_password(&String::from_utf8_lossy(&stderr), spec.password());
    let code = status.code();

    info!(
        index,
        target = %spec.target,
        exit_code = ?code,
        success = status.success(),
        bytes = stdout.len(),
        "dump process exited"
    );

    if !status.success() {
        return Err(DumpError::ToolExecution {
            command: command_line,
            code,
            stderr,
        });
    }

    for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
        debug!(index, "stderr: {}", line);
    }

    Ok(CapturedOutput {
        stdout,
        stderr,
        code,
    })
}

async fn drain<R>(reader: Option<R>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
        reader.read_to_end(&mut buf).await?;
    }
    Ok(buf)
}
