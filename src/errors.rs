// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! Every variant renders without the database password: commands are carried
//! in their redacted form and captured stderr is scrubbed before it lands here.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DumpError {
    /// Missing database name / password, or an unusable output name.
    /// Raised before any process is spawned.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The dump tool could not be launched at all.
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The dump tool ran but exited non-zero.
    #[error("dump failed ({}) for `{command}`: {}", exit_code_label(.code), .stderr.trim())]
    ToolExecution {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("dump timed out after {after:?} for `{command}`")]
    Timeout { command: String, after: Duration },

    /// The output file could not be created or fully written.
    #[error("failed to write dump file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, DumpError>;
