//! Query results.

use serde::{Deserialize, Serialize};

use crate::schema::Value;

/// An ordered, possibly truncated result table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    /// Rows before display truncation.
    pub total_rows: usize,
}

impl ResultTable {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let total_rows = rows.len();
        Self {
            columns,
            rows,
            total_rows,
        }
    }

    /// Keep only the first `n` rows, remembering how many there were.
    pub fn truncated(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Cut the result itself to `n` rows; the dropped rows are not counted.
    pub fn limited(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self.total_rows = self.rows.len();
        self
    }

    pub fn is_truncated(&self) -> bool {
        self.rows.len() < self.total_rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[index]).collect())
    }

    /// Look up a cell by row position and column name.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }
}

/// What a catalog entry produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryOutput {
    Table {
        table: ResultTable,
    },
    Scalar {
        label: String,
        value: Value,
    },
    /// A grouped table plus its single smallest row.
    TableWithMinimum {
        table: ResultTable,
        label: String,
        minimum: ResultTable,
    },
}

impl QueryOutput {
    /// The main table, if the output has one.
    pub fn table(&self) -> Option<&ResultTable> {
        match self {
            QueryOutput::Table { table } | QueryOutput::TableWithMinimum { table, .. } => {
                Some(table)
            }
            QueryOutput::Scalar { .. } => None,
        }
    }

    pub fn scalar(&self) -> Option<&Value> {
        match self {
            QueryOutput::Scalar { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn minimum(&self) -> Option<&ResultTable> {
        match self {
            QueryOutput::TableWithMinimum { minimum, .. } => Some(minimum),
            _ => None,
        }
    }
}
