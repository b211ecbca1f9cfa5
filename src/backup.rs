// src/backup.rs

//! The backup pipeline: validate, build commands, run them, write the file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::assemble::{concat_outputs, write_dump};
use crate::command::build_commands;
use crate::config::model::DEFAULT_OUTPUT_DIR;
use crate::config::{BackupRequest, validate_output_name};
use crate::errors::{DumpError, Result};
use crate::exec::{DumpBackend, ProcessBackend, run_all};
use crate::fs::{FileSystem, RealFileSystem};

/// Runs backups against a dump backend and writes into a filesystem.
///
/// Production code uses [`Backup::real`]; tests inject a fake backend and a
/// [`crate::fs::mock::MockFileSystem`].
#[derive(Debug)]
pub struct Backup<B, F> {
    backend: Arc<B>,
    fs: F,
    output_dir: PathBuf,
}

impl Backup<ProcessBackend, RealFileSystem> {
    pub fn real() -> Self {
        Backup::new(ProcessBackend, RealFileSystem)
    }
}

impl<B, F> Backup<B, F>
where
    B: DumpBackend + 'static,
    F: FileSystem,
{
    pub fn new(backend: B, fs: F) -> Self {
        Self::with_shared_backend(Arc::new(backend), fs)
    }

    /// Like [`Backup::new`], but keeps a handle the caller can inspect.
    pub fn with_shared_backend(backend: Arc<B>, fs: F) -> Self {
        Self {
            backend,
            fs,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Dump everything `request` describes into `<output_dir>/<output_name>.sql`.
    ///
    /// Nothing is spawned if the request or name is invalid, and nothing is
    /// written unless every invocation succeeded.
    pub async fn perform_backup(
        &self,
        request: &BackupRequest,
        output_name: &str,
    ) -> Result<PathBuf> {
        validate_output_name(output_name).map_err(DumpError::Validation)?;
        let specs = build_commands(request)?;

        info!(
            database = %request.database_name,
            invocations = specs.len(),
            output = %output_name,
            "starting backup"
        );

        let outputs = run_all(
            Arc::clone(&self.backend),
            &request.tool,
            specs,
            request.timeout,
        )
        .await?;

        let contents = concat_outputs(&outputs);
        write_dump(&self.fs, &self.output_dir, output_name, &contents)
    }
}
