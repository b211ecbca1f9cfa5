// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `tabledump`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "tabledump",
    version,
    about = "Dump MySQL tables with mysqldump, concurrently, into one .sql file.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Optional: if the file does not exist, connection settings are read
    /// from `DATABASE_NAME`, `DATABASE_PASSWORD`, etc. and the whole database
    /// is dumped.
    #[arg(long, value_name = "PATH", default_value = "Tabledump.toml")]
    pub config: String,

    /// Logical output name; the file is written as `<NAME>.sql`.
    ///
    /// Overrides `[output].name` (default: `dump`).
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Output directory. Overrides `[output].dir` (default: `dump`).
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<String>,

    /// Dump program to run. Replaces the whole `[tool]` command, leading
    /// arguments included.
    #[arg(long, value_name = "PROGRAM")]
    pub tool: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TABLEDUMP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the invocations (password masked) without running them.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
