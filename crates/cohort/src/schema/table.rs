//! Schema of the merged, classified dataset.

use serde::{Deserialize, Serialize};

use super::column::{Column, ColumnOrigin, ColumnType};

/// Description of one merged column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name.
    pub name: String,
    /// Typed accessor key.
    pub column: Column,
    pub column_type: ColumnType,
    pub origin: ColumnOrigin,
    /// Whether the column can hold nulls after the join.
    pub nullable: bool,
}

impl ColumnSchema {
    fn describe(column: Column) -> Self {
        let nullable = column.column_type().is_numeric() || column.is_internship();
        Self {
            name: column.name().to_string(),
            column,
            column_type: column.column_type(),
            origin: column.origin(),
            nullable,
        }
    }
}

/// Schema for the whole student table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    pub columns: Vec<ColumnSchema>,
}

impl TableSchema {
    /// The fixed schema every merged dataset has.
    pub fn student() -> Self {
        Self {
            columns: Column::ALL.iter().copied().map(ColumnSchema::describe).collect(),
        }
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Resolve a name to its typed accessor.
    pub fn resolve(&self, name: &str) -> Option<Column> {
        self.get_column(name).map(|c| c.column)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }
}

impl Default for TableSchema {
    fn default() -> Self {
        Self::student()
    }
}
