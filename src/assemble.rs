// src/assemble.rs

//! Result assembler: joins captured outputs and writes the `.sql` file.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::validate_output_name;
use crate::errors::{DumpError, Result};
use crate::exec::CapturedOutput;
use crate::fs::FileSystem;

pub const DUMP_EXTENSION: &str = "sql";
const PARTIAL_SUFFIX: &str = ".partial";

/// Concatenate stdout of every output in the order given.
pub fn concat_outputs(outputs: &[CapturedOutput]) -> Vec<u8> {
    let len = outputs.iter().map(|o| o.stdout.len()).sum();
    let mut buf = Vec::with_capacity(len);
    for output in outputs {
        buf.extend_from_slice(&output.stdout);
    }
    buf
}

/// `<out_dir>/<name>.sql`
pub fn dump_path(out_dir: &Path, name: &str) -> PathBuf {
    out_dir.join(format!("{name}.{DUMP_EXTENSION}"))
}

/// Write `contents` to `<out_dir>/<name>.sql` and return that path.
///
/// The data goes to a `.partial` sibling first and is renamed into place
/// once fully written, so the final path either holds the complete dump or
/// is left untouched.
pub fn write_dump(
    fs: &dyn FileSystem,
    out_dir: &Path,
    name: &str,
    contents: &[u8],
) -> Result<PathBuf> {
    validate_output_name(name).map_err(DumpError::Validation)?;

    fs.create_dir_all(out_dir).map_err(|source| DumpError::Write {
        path: out_dir.to_path_buf(),
        source,
    })?;

    let path = dump_path(out_dir, name);
    let partial = partial_path(&path);

    if let Err(source) = fs.write(&partial, contents) {
        discard_partial(fs, &partial);
        return Err(DumpError::Write {
            path: partial,
            source,
        });
    }

    if let Err(source) = fs.rename(&partial, &path) {
        discard_partial(fs, &partial);
        return Err(DumpError::Write { path, source });
    }

    info!(path = %path.display(), bytes = contents.len(), "dump file written");
    Ok(path)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

fn discard_partial(fs: &dyn FileSystem, partial: &Path) {
    if fs.exists(partial) {
        if let Err(e) = fs.remove_file(partial) {
            warn!(path = %partial.display(), error = %e, "failed to remove partial dump file");
        }
    }
}
