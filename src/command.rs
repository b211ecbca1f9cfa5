// src/command.rs

//! Command builder: turns a [`BackupRequest`] into dump tool invocations.
//!
//! Tables without a row filter are batched into one *bulk* invocation. Each
//! filtered table gets an invocation of its own, because the tool applies a
//! single `-w` filter to everything it dumps in one run.
//!
//! Resulting order: the bulk invocation first (if any), then the filtered
//! invocations in table-list order. The assembler concatenates output in this
//! same order.

use std::fmt;

use crate::config::BackupRequest;
use crate::config::model::{DEFAULT_HOST, DEFAULT_PORT};
use crate::errors::Result;
use crate::types::WHERE_FLAG;

const PASSWORD_PREFIX: &str = "-p";
const REDACTED_PASSWORD: &str = "-p****";

/// What one invocation dumps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DumpTarget {
    /// The unfiltered tables, or the whole database when the list is empty.
    Bulk { tables: Vec<String> },
    /// A single table restricted to rows matching `filter`.
    Filtered { table: String, filter: String },
}

impl fmt::Display for DumpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DumpTarget::Bulk { tables } if tables.is_empty() => f.write_str("<database>"),
            DumpTarget::Bulk { tables } => f.write_str(&tables.join(",")),
            DumpTarget::Filtered { table, .. } => write!(f, "{table} (filtered)"),
        }
    }
}

/// Argument list for one dump tool invocation.
///
/// `args` does not include the program or its leading arguments; those come
/// from [`crate::config::DumpTool`] at spawn time.
#[derive(Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub target: DumpTarget,
    pub args: Vec<String>,
    password_index: usize,
}

impl CommandSpec {
    /// The arguments as a space separated string with the password masked.
    ///
    /// This is the only form of a command that may appear in logs or errors.
    pub fn redacted(&self) -> String {
        self.args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                if i == self.password_index {
                    REDACTED_PASSWORD
                } else {
                    arg.as_str()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The password embedded in this command, for scrubbing tool output.
    pub(crate) fn password(&self) -> &str {
        self.args
            .get(self.password_index)
            .and_then(|arg| arg.strip_prefix(PASSWORD_PREFIX))
            .unwrap_or_default()
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("target", &self.target)
            .field("args", &self.redacted())
            .finish()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Build every invocation needed for `request`.
///
/// Fails with [`crate::errors::DumpError::Validation`] when the database
/// name or password is missing. Otherwise this is a pure function: identical
/// requests produce identical output.
pub fn build_commands(request: &BackupRequest) -> Result<Vec<CommandSpec>> {
    request.validate()?;

    let (unfiltered, filtered) = partition_tables(request);
    let (base, password_index) = base_args(request);

    let mut specs = Vec::with_capacity(filtered.len() + 1);

    // No table constraints at all means a whole-database dump.
    if !unfiltered.is_empty() || filtered.is_empty() {
        let mut args = base.clone();
        args.extend(unfiltered.iter().cloned());
        if let Some(filter) = request.options.global_filter() {
            args.push(WHERE_FLAG.to_string());
            args.push(filter.to_string());
        }
        specs.push(CommandSpec {
            target: DumpTarget::Bulk { tables: unfiltered },
            args,
            password_index,
        });
    }

    for (table, filter) in filtered {
        let mut args = base.clone();
        args.push(table.clone());
        args.push(WHERE_FLAG.to_string());
        args.push(filter.clone());
        specs.push(CommandSpec {
            target: DumpTarget::Filtered { table, filter },
            args,
            password_index,
        });
    }

    Ok(specs)
}

/// Split the table list into unfiltered names and `(table, filter)` pairs,
/// keeping relative order within each group.
pub fn partition_tables(request: &BackupRequest) -> (Vec<String>, Vec<(String, String)>) {
    let mut unfiltered = Vec::new();
    let mut filtered = Vec::new();

    for spec in &request.tables {
        match spec.filter() {
            Some(filter) => filtered.push((spec.table().to_string(), filter.to_string())),
            None => unfiltered.push(spec.table().to_string()),
        }
    }

    (unfiltered, filtered)
}

/// `-u <user> -p<password> [-h <host>] [-P <port>] <database> <flags...>`
///
/// Host and port are only emitted when they differ from the defaults.
/// Returns the arguments and the index of the password token.
fn base_args(request: &BackupRequest) -> (Vec<String>, usize) {
    let mut args = vec![
        "-u".to_string(),
        request.user.clone(),
        format!("{PASSWORD_PREFIX}{}", request.password),
    ];
    let password_index = args.len() - 1;

    if request.host != DEFAULT_HOST {
        args.push("-h".to_string());
        args.push(request.host.clone());
    }
    if request.port != DEFAULT_PORT {
        args.push("-P".to_string());
        args.push(request.port.to_string());
    }

    args.push(request.database_name.clone());
    args.extend(request.options.enabled_flags().map(|f| f.token().to_string()));

    (args, password_index)
}

/// Mask the password in free text such as captured stderr.
///
/// Only the `-p<password>` token and occurrences standing alone as a word
/// are replaced. Matches inside a longer word are left intact, so a short
/// password like `x` does not mangle `execute` or `syntax`.
pub fn scrub_password(text: &str, password: &str) -> String {
    if password.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(password) {
        let end = pos + password.len();
        let head = &rest[..pos];
        let tail = &rest[end..];

        let after_flag = head
            .strip_suffix(PASSWORD_PREFIX)
            .is_some_and(|before| !ends_with_word_char(before));
        let standalone = (after_flag || !ends_with_word_char(head)) && !starts_with_word_char(tail);

        out.push_str(head);
        out.push_str(if standalone { "****" } else { &rest[pos..end] });
        rest = tail;
    }

    out.push_str(rest);
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn ends_with_word_char(s: &str) -> bool {
    s.chars().next_back().is_some_and(is_word_char)
}

fn starts_with_word_char(s: &str) -> bool {
    s.chars().next().is_some_and(is_word_char)
}
