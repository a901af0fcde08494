//! Schema types for the merged student table.

mod column;
mod table;
mod value;

pub use column::{Column, ColumnOrigin, ColumnType};
pub use table::{ColumnSchema, TableSchema};
pub use value::Value;
