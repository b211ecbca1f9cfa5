// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{
    BackupRequest, ConfigFile, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_PROGRAM, DEFAULT_USER,
    DumpTool, RawConfigFile,
};
use crate::errors::{DumpError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DumpError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;

        let conn = raw.connection;
        let request = BackupRequest {
            host: non_empty(conn.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: conn.port.unwrap_or(DEFAULT_PORT),
            database_name: conn.database.unwrap_or_default(),
            user: non_empty(conn.user).unwrap_or_else(|| DEFAULT_USER.to_string()),
            password: conn.password.unwrap_or_default(),
            options: raw.options,
            tables: raw.tables,
            tool: DumpTool {
                program: non_empty(raw.tool.program)
                    .unwrap_or_else(|| DEFAULT_PROGRAM.to_string()),
                args: raw.tool.args,
            },
            timeout: raw.tool.timeout_secs.map(Duration::from_secs),
        };
        request.validate()?;

        Ok(ConfigFile::new_unchecked(request, raw.output))
    }
}

impl BackupRequest {
    /// Check the preconditions for building commands.
    ///
    /// Called before any process is spawned; a request that fails here has no
    /// side effects.
    pub fn validate(&self) -> Result<()> {
        if self.database_name.trim().is_empty() || self.password.is_empty() {
            return Err(DumpError::Validation(
                "please set database name and password".to_string(),
            ));
        }
        if self.user.trim().is_empty() {
            return Err(DumpError::Validation("user must not be empty".to_string()));
        }
        if self.tool.program.trim().is_empty() {
            return Err(DumpError::Validation(
                "dump program must not be empty".to_string(),
            ));
        }
        if let Some(pos) = self.tables.iter().position(|t| t.table().trim().is_empty()) {
            return Err(DumpError::Validation(format!(
                "table entry #{} has an empty name",
                pos + 1
            )));
        }
        Ok(())
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    if cfg.connection.port == Some(0) {
        return Err(DumpError::Config(
            "[connection].port must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.tool.timeout_secs == Some(0) {
        return Err(DumpError::Config(
            "[tool].timeout_secs must be >= 1 (got 0); omit it to disable the timeout"
                .to_string(),
        ));
    }
    if let Some(name) = cfg.output.name.as_deref() {
        validate_output_name(name).map_err(DumpError::Config)?;
    }
    Ok(())
}

/// Check that a logical output name is a plain file stem.
///
/// The name ends up as `<dir>/<name>.sql`, so it must not be able to escape
/// the output directory.
pub fn validate_output_name(name: &str) -> std::result::Result<(), String> {
    if name.trim().is_empty() {
        return Err("output name must not be empty".to_string());
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(format!(
            "output name '{name}' must be a plain file name without path separators"
        ));
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
