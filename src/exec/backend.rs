// src/exec/backend.rs

//! Pluggable dump backend abstraction.
//!
//! The orchestrator talks to a `DumpBackend` instead of spawning processes
//! itself, so tests can record invocations and script their results while
//! production uses [`super::ProcessBackend`].

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::command::CommandSpec;
use crate::config::DumpTool;
use crate::errors::Result;

/// One scheduled run of the dump tool.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Position in the command list; results are reassembled by this index.
    pub index: usize,
    pub tool: DumpTool,
    pub spec: CommandSpec,
    pub timeout: Option<Duration>,
}

/// Result of an invocation that exited with status 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: Vec<u8>,
    /// Diagnostics the tool printed even though it succeeded, password
    /// scrubbed.
    pub stderr: String,
    pub code: Option<i32>,
}

impl CapturedOutput {
    pub fn from_stdout(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            code: Some(0),
        }
    }
}

/// Trait abstracting how an invocation is executed.
///
/// Implementations resolve to the captured stdout on success, and to
/// `DumpError::Spawn` / `DumpError::ToolExecution` on failure.
pub trait DumpBackend: Send + Sync {
    fn run(
        &self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<CapturedOutput>> + Send + '_>>;
}
