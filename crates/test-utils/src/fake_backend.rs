use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Mutex;
use std::time::Duration;

use tabledump::command::DumpTarget;
use tabledump::errors::{DumpError, Result};
use tabledump::exec::{CapturedOutput, DumpBackend, Invocation};

/// What the fake returns for one invocation.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    Output(Vec<u8>),
    Exit { code: i32, stderr: String },
    SpawnError(io::ErrorKind),
}

/// A fake backend that:
/// - records every invocation it is asked to run (a spawn spy)
/// - answers with a scripted response per invocation index, after an
///   optional delay
///
/// Unscripted invocations succeed with a one-line dump naming their target,
/// e.g. `-- bulk customers,orders\n` or `-- filtered orders\n`.
#[derive(Debug, Default)]
pub struct FakeDumpBackend {
    calls: Mutex<Vec<Invocation>>,
    responses: Mutex<HashMap<usize, FakeResponse>>,
    delays: Mutex<HashMap<usize, Duration>>,
}

impl FakeDumpBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, index: usize, response: FakeResponse) -> Self {
        self.responses.lock().unwrap().insert(index, response);
        self
    }

    pub fn output(self, index: usize, stdout: &str) -> Self {
        self.respond(index, FakeResponse::Output(stdout.as_bytes().to_vec()))
    }

    pub fn fail(self, index: usize, code: i32, stderr: &str) -> Self {
        self.respond(
            index,
            FakeResponse::Exit {
                code,
                stderr: stderr.to_string(),
            },
        )
    }

    pub fn delay(self, index: usize, delay: Duration) -> Self {
        self.delays.lock().unwrap().insert(index, delay);
        self
    }

    pub fn spawn_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Recorded invocations, sorted by index.
    pub fn invocations(&self) -> Vec<Invocation> {
        let mut calls = self.calls.lock().unwrap().clone();
        calls.sort_by_key(|inv| inv.index);
        calls
    }
}

pub fn default_output(target: &DumpTarget) -> Vec<u8> {
    match target {
        DumpTarget::Bulk { tables } => format!("-- bulk {}\n", tables.join(",")).into_bytes(),
        DumpTarget::Filtered { table, .. } => format!("-- filtered {table}\n").into_bytes(),
    }
}

impl DumpBackend for FakeDumpBackend {
    fn run(
        &self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<CapturedOutput>> + Send + '_>> {
        let index = invocation.index;
        let response = self
            .responses
            .lock()
            .unwrap()
            .get(&index)
            .cloned()
            .unwrap_or_else(|| FakeResponse::Output(default_output(&invocation.spec.target)));
        let delay = self.delays.lock().unwrap().get(&index).copied();
        let command = invocation.spec.redacted();
        let program = invocation.tool.program.clone();

        self.calls.lock().unwrap().push(invocation);

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            match response {
                FakeResponse::Output(stdout) => Ok(CapturedOutput::from_stdout(stdout)),
                FakeResponse::Exit { code, stderr } => Err(DumpError::ToolExecution {
                    command,
                    code: Some(code),
                    stderr,
                }),
                FakeResponse::SpawnError(kind) => Err(DumpError::Spawn {
                    program,
                    source: io::Error::new(kind, "simulated spawn failure"),
                }),
            }
        })
    }
}
