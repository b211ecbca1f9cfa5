// src/lib.rs

pub mod assemble;
pub mod backup;
pub mod cli;
pub mod command;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod types;

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use crate::backup::Backup;
pub use crate::command::{CommandSpec, DumpTarget, build_commands};
pub use crate::config::{BackupRequest, DumpOptions, DumpTool};
pub use crate::errors::{DumpError, Result};
pub use crate::types::{DumpFlag, TableSpec};

use crate::cli::CliArgs;
use crate::config::load_and_validate;

/// High-level entry point used by `main.rs`.
///
/// Loads config (file + environment), applies CLI overrides, then either
/// prints the planned invocations (`--dry-run`, returns `None`) or performs
/// the backup and returns the written path.
pub async fn run(args: CliArgs) -> Result<Option<PathBuf>> {
    let cfg = load_and_validate(&args.config)?;
    let (mut request, output) = cfg.into_parts();

    if let Some(tool) = args.tool {
        request.tool = DumpTool::new(tool);
    }
    let name = args.name.unwrap_or_else(|| output.name_or_default());
    let out_dir = args
        .out_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| output.dir_or_default());

    if args.dry_run {
        print!("{}", render_dry_run(&request, &out_dir, &name)?);
        debug!("dry-run complete (no execution)");
        return Ok(None);
    }

    let path = Backup::real()
        .with_output_dir(out_dir)
        .perform_backup(&request, &name)
        .await?;

    info!(path = %path.display(), "backup complete");
    Ok(Some(path))
}

/// Render each planned invocation with the password masked.
///
/// Builds commands only; nothing is spawned or written.
pub fn render_dry_run(request: &BackupRequest, out_dir: &Path, name: &str) -> Result<String> {
    let specs = build_commands(request)?;
    let program = std::iter::once(request.tool.program.as_str())
        .chain(request.tool.args.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = String::new();
    let _ = writeln!(out, "tabledump dry-run");
    let _ = writeln!(out, "  database = {}", request.database_name);
    let _ = writeln!(out, "  output   = {}", assemble::dump_path(out_dir, name).display());
    let _ = writeln!(out);
    let _ = writeln!(out, "invocations ({}):", specs.len());
    for (i, spec) in specs.iter().enumerate() {
        let _ = writeln!(out, "  [{i}] {}", spec.target);
        let _ = writeln!(out, "      {program} {spec}");
    }

    Ok(out)
}
