//! Inventory rows. Pure data; parsing lives in `ingestplan-io`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One source table from the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRecord {
    pub server_name: String,
    pub connection_name: String,
    pub database_name: String,
    pub schema_name: String,
    pub table_name: String,
    /// Approximate row count; `0` means unknown.
    pub row_count: u64,
    pub priority_flag: bool,
}

impl TableRecord {
    pub fn new(
        server_name: impl Into<String>,
        connection_name: impl Into<String>,
        database_name: impl Into<String>,
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Self {
        Self {
            server_name: server_name.into(),
            connection_name: connection_name.into(),
            database_name: database_name.into(),
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            row_count: 0,
            priority_flag: false,
        }
    }

    pub fn with_rows(mut self, row_count: u64) -> Self {
        self.row_count = row_count;
        self
    }

    pub fn with_priority(mut self, priority: bool) -> Self {
        self.priority_flag = priority;
        self
    }

    pub fn key(&self) -> TableKey {
        TableKey {
            server_name: self.server_name.clone(),
            database_name: self.database_name.clone(),
            schema_name: self.schema_name.clone(),
            table_name: self.table_name.clone(),
        }
    }

    /// Identifying fields in column order, for validation messages.
    pub fn identifying_fields(&self) -> [(&'static str, &str); 5] {
        [
            ("server_name", &self.server_name),
            ("connection_name", &self.connection_name),
            ("database_name", &self.database_name),
            ("schema_name", &self.schema_name),
            ("table_name", &self.table_name),
        ]
    }

    /// `database.schema.table`
    pub fn qualified_name(&self) -> String {
        format!(
            "{}.{}.{}",
            self.database_name, self.schema_name, self.table_name
        )
    }
}

/// Identity of a table within one inventory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableKey {
    pub server_name: String,
    pub database_name: String,
    pub schema_name: String,
    pub table_name: String,
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}.{}.{}",
            self.server_name, self.database_name, self.schema_name, self.table_name
        )
    }
}
