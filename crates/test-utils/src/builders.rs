use tabledump::config::{ConfigFile, RawConfigFile};
use tabledump::{BackupRequest, DumpFlag, TableSpec};

/// The `shop` database used throughout the tests:
/// `customers` whole, `orders` filtered to open ones.
pub fn shop_request() -> BackupRequest {
    BackupRequest::new("shop", "x")
        .with_table("customers")
        .with_table(("orders", "status='open'"))
}

/// Builder for `RawConfigFile` / `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn database(mut self, name: &str) -> Self {
        self.config.connection.database = Some(name.to_string());
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.config.connection.password = Some(password.to_string());
        self
    }

    pub fn table(mut self, table: impl Into<TableSpec>) -> Self {
        self.config.tables.push(table.into());
        self
    }

    pub fn flag(mut self, flag: DumpFlag) -> Self {
        self.config.options.set(flag, true);
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
