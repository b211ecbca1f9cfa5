// src/config/model.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::types::{DumpFlag, TableSpec};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3306;
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_PROGRAM: &str = "mysqldump";
pub const DEFAULT_OUTPUT_DIR: &str = "dump";
pub const DEFAULT_OUTPUT_NAME: &str = "dump";

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// tables = ["customers", { table = "orders", where = "status='open'" }]
///
/// [connection]
/// database = "shop"
/// user = "backup"
///
/// [options]
/// compact = true
/// add_drop_table = true
///
/// [output]
/// dir = "dump"
/// name = "shop"
/// ```
///
/// Every section is optional; the database name and password usually come
/// from `DATABASE_NAME` / `DATABASE_PASSWORD` instead (see
/// [`crate::config::loader`]).
///
/// This is the raw deserialized form. Use [`ConfigFile::try_from`] to obtain
/// a validated configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Tables to dump, in output order. Empty means the whole database.
    #[serde(default)]
    pub tables: Vec<TableSpec>,

    #[serde(default)]
    pub connection: ConnectionSection,

    #[serde(default)]
    pub tool: ToolSection,

    #[serde(default)]
    pub options: DumpOptions,

    #[serde(default)]
    pub output: OutputSection,
}

/// `[connection]` section.
#[derive(Clone, Default, Deserialize)]
pub struct ConnectionSection {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub database: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for ConnectionSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionSection")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("database", &self.database)
            .field("password", &self.password.as_ref().map(|_| "****"))
            .finish()
    }
}

/// `[tool]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolSection {
    /// Dump program; defaults to `mysqldump` on `PATH`.
    pub program: Option<String>,

    /// Arguments placed before the generated ones, e.g.
    /// `program = "docker"`, `args = ["exec", "db", "mysqldump"]`.
    #[serde(default)]
    pub args: Vec<String>,

    /// Per-invocation timeout. Unset means wait indefinitely.
    pub timeout_secs: Option<u64>,
}

/// `[options]` section: switches forwarded to the dump tool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DumpOptions {
    #[serde(default)]
    pub no_data: bool,

    #[serde(default)]
    pub compact: bool,

    #[serde(default)]
    pub add_drop_database: bool,

    #[serde(default)]
    pub add_drop_table: bool,

    #[serde(default)]
    pub routines: bool,

    /// Default row filter for the bulk invocation.
    #[serde(default, rename = "where")]
    pub filter: Option<String>,
}

impl DumpOptions {
    pub fn is_set(&self, flag: DumpFlag) -> bool {
        match flag {
            DumpFlag::NoData => self.no_data,
            DumpFlag::Compact => self.compact,
            DumpFlag::AddDropDatabase => self.add_drop_database,
            DumpFlag::AddDropTable => self.add_drop_table,
            DumpFlag::Routines => self.routines,
        }
    }

    /// Enabled flags in canonical order.
    pub fn enabled_flags(&self) -> impl Iterator<Item = DumpFlag> + '_ {
        DumpFlag::ALL
            .into_iter()
            .filter(move |flag| self.is_set(*flag))
    }

    pub fn set(&mut self, flag: DumpFlag, on: bool) {
        match flag {
            DumpFlag::NoData => self.no_data = on,
            DumpFlag::Compact => self.compact = on,
            DumpFlag::AddDropDatabase => self.add_drop_database = on,
            DumpFlag::AddDropTable => self.add_drop_table = on,
            DumpFlag::Routines => self.routines = on,
        }
    }

    /// The global filter, ignoring blank strings.
    pub fn global_filter(&self) -> Option<&str> {
        self.filter.as_deref().filter(|f| !f.trim().is_empty())
    }
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputSection {
    pub dir: Option<PathBuf>,
    pub name: Option<String>,
}

impl OutputSection {
    pub fn dir_or_default(&self) -> PathBuf {
        self.dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn name_or_default(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| DEFAULT_OUTPUT_NAME.to_string())
    }
}

/// The external program that produces dump text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpTool {
    pub program: String,
    /// Leading arguments, placed before every generated argument list.
    pub args: Vec<String>,
}

impl DumpTool {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl Default for DumpTool {
    fn default() -> Self {
        DumpTool::new(DEFAULT_PROGRAM)
    }
}

/// Everything needed for one backup run.
///
/// Built either directly (library use) or from a validated [`ConfigFile`].
/// The `Debug` impl never prints the password.
#[derive(Clone, PartialEq, Eq)]
pub struct BackupRequest {
    pub host: String,
    pub port: u16,
    pub database_name: String,
    pub user: String,
    pub password: String,
    pub options: DumpOptions,
    pub tables: Vec<TableSpec>,
    pub tool: DumpTool,
    pub timeout: Option<Duration>,
}

impl BackupRequest {
    pub fn new(database_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database_name: database_name.into(),
            user: DEFAULT_USER.to_string(),
            password: password.into(),
            options: DumpOptions::default(),
            tables: Vec::new(),
            tool: DumpTool::default(),
            timeout: None,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn with_options(mut self, options: DumpOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_flag(mut self, flag: DumpFlag) -> Self {
        self.options.set(flag, true);
        self
    }

    pub fn with_table(mut self, table: impl Into<TableSpec>) -> Self {
        self.tables.push(table.into());
        self
    }

    pub fn with_tables<I, T>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TableSpec>,
    {
        self.tables.extend(tables.into_iter().map(Into::into));
        self
    }

    pub fn with_tool(mut self, tool: DumpTool) -> Self {
        self.tool = tool;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl fmt::Debug for BackupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackupRequest")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_name", &self.database_name)
            .field("user", &self.user)
            .field("password", &"****")
            .field("options", &self.options)
            .field("tables", &self.tables)
            .field("tool", &self.tool)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Validated configuration.
///
/// Fields are private so a `ConfigFile` can only be obtained through
/// `ConfigFile::try_from(RawConfigFile)`, which runs validation.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    request: BackupRequest,
    output: OutputSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(request: BackupRequest, output: OutputSection) -> Self {
        Self { request, output }
    }

    pub fn request(&self) -> &BackupRequest {
        &self.request
    }

    pub fn output(&self) -> &OutputSection {
        &self.output
    }

    pub fn into_parts(self) -> (BackupRequest, OutputSection) {
        (self.request, self.output)
    }
}
