// src/config/mod.rs

//! Configuration: TOML model, loading with environment overrides, and
//! validation into a [`BackupRequest`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    apply_env_overrides, load_and_validate, load_and_validate_with_env, load_from_path,
};
pub use model::{
    BackupRequest, ConfigFile, ConnectionSection, DumpOptions, DumpTool, OutputSection,
    RawConfigFile, ToolSection,
};
pub use validate::validate_output_name;
