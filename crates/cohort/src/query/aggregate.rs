//! Aggregate functions computed per group.

use serde::{Deserialize, Serialize};

use crate::dataset::StudentRecord;
use crate::error::QueryError;
use crate::schema::{Column, TableSchema, Value};

use super::predicate::{CompiledPredicate, Predicate};

/// Declarative aggregate over the rows of a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "fn", rename_all = "snake_case")]
pub enum Aggregate {
    /// Number of rows.
    Count { alias: String },
    /// Number of rows matching a predicate.
    CountWhere { predicate: Predicate, alias: String },
    /// Mean of the non-null values of a numeric column.
    Avg { column: String, alias: String },
    /// `count_where / count * 100`, truncated toward zero to an integer.
    PercentWhere { predicate: Predicate, alias: String },
}

impl Aggregate {
    pub fn count(alias: &str) -> Self {
        Aggregate::Count {
            alias: alias.to_string(),
        }
    }

    pub fn avg(column: &str, alias: &str) -> Self {
        Aggregate::Avg {
            column: column.to_string(),
            alias: alias.to_string(),
        }
    }

    pub fn count_where(predicate: Predicate, alias: &str) -> Self {
        Aggregate::CountWhere {
            predicate,
            alias: alias.to_string(),
        }
    }

    pub fn percent_where(predicate: Predicate, alias: &str) -> Self {
        Aggregate::PercentWhere {
            predicate,
            alias: alias.to_string(),
        }
    }

    /// Output column name.
    pub fn alias(&self) -> &str {
        match self {
            Aggregate::Count { alias }
            | Aggregate::CountWhere { alias, .. }
            | Aggregate::Avg { alias, .. }
            | Aggregate::PercentWhere { alias, .. } => alias,
        }
    }

    pub fn compile(&self, schema: &TableSchema, entry: u32) -> Result<CompiledAggregate, QueryError> {
        Ok(match self {
            Aggregate::Count { .. } => CompiledAggregate::Count,
            Aggregate::CountWhere { predicate, .. } => {
                CompiledAggregate::CountWhere(predicate.compile(schema, entry)?)
            }
            Aggregate::PercentWhere { predicate, .. } => {
                CompiledAggregate::PercentWhere(predicate.compile(schema, entry)?)
            }
            Aggregate::Avg { column, .. } => {
                let resolved = schema.resolve(column).ok_or_else(|| QueryError::UnknownColumn {
                    entry,
                    column: column.clone(),
                })?;
                if !resolved.column_type().is_numeric() {
                    return Err(QueryError::NonNumericAggregate {
                        entry,
                        column: column.clone(),
                    });
                }
                CompiledAggregate::Avg(resolved)
            }
        })
    }
}

/// An aggregate bound to typed columns.
#[derive(Debug, Clone)]
pub enum CompiledAggregate {
    Count,
    CountWhere(CompiledPredicate),
    Avg(Column),
    PercentWhere(CompiledPredicate),
}

impl CompiledAggregate {
    /// Evaluate over the rows of one group.
    pub fn evaluate(&self, rows: &[&StudentRecord]) -> Value {
        match self {
            CompiledAggregate::Count => Value::Int(rows.len() as i64),
            CompiledAggregate::CountWhere(predicate) => {
                Value::Int(rows.iter().filter(|r| predicate.matches(r)).count() as i64)
            }
            CompiledAggregate::Avg(column) => {
                let values: Vec<f64> = rows
                    .iter()
                    .filter_map(|r| r.value(*column).as_f64())
                    .collect();
                if values.is_empty() {
                    Value::Null
                } else {
                    Value::Float(values.iter().sum::<f64>() / values.len() as f64)
                }
            }
            CompiledAggregate::PercentWhere(predicate) => {
                if rows.is_empty() {
                    return Value::Null;
                }
                let hits = rows.iter().filter(|r| predicate.matches(r)).count();
                percent_truncated(hits, rows.len())
            }
        }
    }
}

/// `hits / total * 100` cast to an integer, truncating toward zero.
pub fn percent_truncated(hits: usize, total: usize) -> Value {
    let rate = hits as f64 / total as f64 * 100.0;
    Value::Int(rate as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_truncates() {
        assert_eq!(percent_truncated(2, 5), Value::Int(40));
        assert_eq!(percent_truncated(1, 3), Value::Int(33));
        assert_eq!(percent_truncated(2, 3), Value::Int(66));
        assert_eq!(percent_truncated(3, 3), Value::Int(100));
        assert_eq!(percent_truncated(0, 7), Value::Int(0));
    }

    #[test]
    fn test_avg_requires_numeric_column() {
        let err = Aggregate::avg("Gender", "Avg_Gender")
            .compile(&TableSchema::student(), 5)
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::NonNumericAggregate {
                entry: 5,
                column: "Gender".to_string()
            }
        );
    }

    #[test]
    fn test_avg_unknown_column() {
        let err = Aggregate::avg("Height", "Avg_Height")
            .compile(&TableSchema::student(), 5)
            .unwrap_err();
        assert!(matches!(err, QueryError::UnknownColumn { .. }));
    }

    #[test]
    fn test_avg_of_empty_group_is_null() {
        assert_eq!(CompiledAggregate::Avg(Column::Gpa).evaluate(&[]), Value::Null);
        assert_eq!(CompiledAggregate::Count.evaluate(&[]), Value::Int(0));
    }

    #[test]
    fn test_aggregate_json_shape() {
        let aggregate: Aggregate =
            serde_json::from_str(r#"{"fn": "avg", "column": "GPA", "alias": "Avg_GPA"}"#).unwrap();
        assert_eq!(aggregate, Aggregate::avg("GPA", "Avg_GPA"));
        assert_eq!(aggregate.alias(), "Avg_GPA");
    }
}
