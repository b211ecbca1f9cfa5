use std::fmt;

use serde::Deserialize;

/// Token passed to the dump tool ahead of a row filter expression.
pub const WHERE_FLAG: &str = "-w";

/// Boolean dump options, in the canonical order they appear on the command
/// line.
///
/// The order of [`DumpFlag::ALL`] is what makes two builds of the same
/// request produce identical argument lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DumpFlag {
    /// Schema only, no row data.
    NoData,
    Compact,
    AddDropDatabase,
    AddDropTable,
    /// Include stored procedures and functions.
    Routines,
}

impl DumpFlag {
    pub const ALL: [DumpFlag; 5] = [
        DumpFlag::NoData,
        DumpFlag::Compact,
        DumpFlag::AddDropDatabase,
        DumpFlag::AddDropTable,
        DumpFlag::Routines,
    ];

    pub fn token(self) -> &'static str {
        match self {
            DumpFlag::NoData => "--no-data",
            DumpFlag::Compact => "--compact",
            DumpFlag::AddDropDatabase => "--add-drop-database",
            DumpFlag::AddDropTable => "--add-drop-table",
            DumpFlag::Routines => "--routines",
        }
    }
}

impl fmt::Display for DumpFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One entry of the table list.
///
/// In TOML this is either a bare string or an inline table:
///
/// ```toml
/// tables = ["customers", { table = "orders", where = "status='open'" }]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TableSpec {
    Name(String),
    Filtered {
        table: String,
        #[serde(default, rename = "where")]
        filter: Option<String>,
    },
}

impl TableSpec {
    pub fn name(name: impl Into<String>) -> Self {
        TableSpec::Name(name.into())
    }

    pub fn filtered(table: impl Into<String>, filter: impl Into<String>) -> Self {
        TableSpec::Filtered {
            table: table.into(),
            filter: Some(filter.into()),
        }
    }

    pub fn table(&self) -> &str {
        match self {
            TableSpec::Name(name) => name,
            TableSpec::Filtered { table, .. } => table,
        }
    }

    /// The row filter, if this entry needs an invocation of its own.
    ///
    /// An object entry without a filter (or with an empty one) dumps the
    /// whole table and is batched with the bare names.
    pub fn filter(&self) -> Option<&str> {
        match self {
            TableSpec::Name(_) => None,
            TableSpec::Filtered { filter, .. } => {
                filter.as_deref().filter(|f| !f.trim().is_empty())
            }
        }
    }
}

impl From<&str> for TableSpec {
    fn from(name: &str) -> Self {
        TableSpec::name(name)
    }
}

impl From<(&str, &str)> for TableSpec {
    fn from((table, filter): (&str, &str)) -> Self {
        TableSpec::filtered(table, filter)
    }
}
