// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DumpError, Result};

pub const ENV_DATABASE_NAME: &str = "DATABASE_NAME";
pub const ENV_DATABASE_PASSWORD: &str = "DATABASE_PASSWORD";
pub const ENV_DATABASE_HOST: &str = "DATABASE_HOST";
pub const ENV_DATABASE_PORT: &str = "DATABASE_PORT";
pub const ENV_DATABASE_USER: &str = "DATABASE_USER";

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] for
/// environment overrides and validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load config from path, apply `DATABASE_*` environment overrides, and
/// validate.
///
/// A missing file is not an error: the environment alone can describe a
/// whole-database dump.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    load_and_validate_with_env(path, |key| std::env::var(key).ok())
}

/// Same as [`load_and_validate`], but reads variables through `env`.
pub fn load_and_validate_with_env<F>(path: impl AsRef<Path>, env: F) -> Result<ConfigFile>
where
    F: Fn(&str) -> Option<String>,
{
    let path = path.as_ref();
    let raw = if path.exists() {
        load_from_path(path)?
    } else {
        debug!(path = %path.display(), "config file not found; using environment only");
        RawConfigFile::default()
    };

    let raw = apply_env_overrides(raw, env)?;
    ConfigFile::try_from(raw)
}

/// Overlay connection settings from the environment.
///
/// Set, non-empty variables win over values from the file.
pub fn apply_env_overrides<F>(mut raw: RawConfigFile, env: F) -> Result<RawConfigFile>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| env(key).filter(|v| !v.is_empty());

    if let Some(name) = var(ENV_DATABASE_NAME) {
        raw.connection.database = Some(name);
    }
    if let Some(password) = var(ENV_DATABASE_PASSWORD) {
        raw.connection.password = Some(password);
    }
    if let Some(host) = var(ENV_DATABASE_HOST) {
        raw.connection.host = Some(host);
    }
    if let Some(user) = var(ENV_DATABASE_USER) {
        raw.connection.user = Some(user);
    }
    if let Some(port) = var(ENV_DATABASE_PORT) {
        let port = port.trim().parse::<u16>().map_err(|e| {
            DumpError::Config(format!("{ENV_DATABASE_PORT}='{port}' is not a valid port: {e}"))
        })?;
        raw.connection.port = Some(port);
    }

    Ok(raw)
}
