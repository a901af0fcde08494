//! Row filters for catalog entries.

use std::cmp::Ordering;
use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dataset::StudentRecord;
use crate::error::QueryError;
use crate::schema::{Column, TableSchema, Value};

// Leading day component of a `DD-MM-YYYY` date.
static DAY_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}-").unwrap());

/// Strip the day from a `DD-MM-YYYY` date, leaving `MM-YYYY`.
pub fn month_year(dob: &str) -> String {
    DAY_PREFIX.replace(dob, "").into_owned()
}

/// Declarative row filter. A null operand never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// Column equals a literal.
    Eq { column: String, value: Value },
    /// Lowercased column differs from a lowercase literal.
    NotEqIgnoreCase { column: String, value: String },
    /// Numeric column strictly below a bound.
    Lt { column: String, value: f64 },
    /// Numeric column strictly above a bound.
    Gt { column: String, value: f64 },
    /// Date column's `MM-YYYY` part is one of the given values.
    MonthYearIn { column: String, values: Vec<String> },
    /// Every inner predicate holds.
    And { all: Vec<Predicate> },
}

impl Predicate {
    pub fn equals(column: &str, value: impl Into<Value>) -> Self {
        Predicate::Eq {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn not_eq_ignore_case(column: &str, value: &str) -> Self {
        Predicate::NotEqIgnoreCase {
            column: column.to_string(),
            value: value.to_string(),
        }
    }

    pub fn lt(column: &str, value: f64) -> Self {
        Predicate::Lt {
            column: column.to_string(),
            value,
        }
    }

    pub fn gt(column: &str, value: f64) -> Self {
        Predicate::Gt {
            column: column.to_string(),
            value,
        }
    }

    pub fn month_year_in(column: &str, values: &[&str]) -> Self {
        Predicate::MonthYearIn {
            column: column.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    pub fn and(all: Vec<Predicate>) -> Self {
        Predicate::And { all }
    }

    /// Every column name this predicate references.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Predicate::Eq { column, .. }
            | Predicate::NotEqIgnoreCase { column, .. }
            | Predicate::Lt { column, .. }
            | Predicate::Gt { column, .. }
            | Predicate::MonthYearIn { column, .. } => vec![column.as_str()],
            Predicate::And { all } => all.iter().flat_map(|p| p.columns()).collect(),
        }
    }

    /// Resolve column names against the schema and check operand types.
    pub fn compile(&self, schema: &TableSchema, entry: u32) -> Result<CompiledPredicate, QueryError> {
        let resolve = |name: &str| {
            schema.resolve(name).ok_or_else(|| QueryError::UnknownColumn {
                entry,
                column: name.to_string(),
            })
        };
        let require = |column: Column, numeric: bool, op: &str| {
            if column.column_type().is_numeric() == numeric {
                Ok(column)
            } else {
                Err(QueryError::InvalidEntry {
                    entry,
                    reason: format!("'{}' cannot be applied to column '{}'", op, column),
                })
            }
        };

        Ok(match self {
            Predicate::Eq { column, value } => CompiledPredicate::Eq(resolve(column)?, value.clone()),
            Predicate::NotEqIgnoreCase { column, value } => CompiledPredicate::NotEqIgnoreCase(
                require(resolve(column)?, false, "not_eq_ignore_case")?,
                value.to_lowercase(),
            ),
            Predicate::Lt { column, value } => {
                CompiledPredicate::Lt(require(resolve(column)?, true, "lt")?, *value)
            }
            Predicate::Gt { column, value } => {
                CompiledPredicate::Gt(require(resolve(column)?, true, "gt")?, *value)
            }
            Predicate::MonthYearIn { column, values } => CompiledPredicate::MonthYearIn(
                require(resolve(column)?, false, "month_year_in")?,
                values.iter().cloned().collect(),
            ),
            Predicate::And { all } => CompiledPredicate::And(
                all.iter()
                    .map(|p| p.compile(schema, entry))
                    .collect::<Result<_, _>>()?,
            ),
        })
    }
}

/// A predicate bound to typed columns, ready to evaluate.
#[derive(Debug, Clone)]
pub enum CompiledPredicate {
    Eq(Column, Value),
    NotEqIgnoreCase(Column, String),
    Lt(Column, f64),
    Gt(Column, f64),
    MonthYearIn(Column, HashSet<String>),
    And(Vec<CompiledPredicate>),
}

impl CompiledPredicate {
    pub fn matches(&self, record: &StudentRecord) -> bool {
        match self {
            CompiledPredicate::Eq(column, expected) => {
                record.value(*column).compare(expected) == Some(Ordering::Equal)
            }
            CompiledPredicate::NotEqIgnoreCase(column, lowered) => record
                .value(*column)
                .as_str()
                .is_some_and(|s| s.to_lowercase() != *lowered),
            CompiledPredicate::Lt(column, bound) => record
                .value(*column)
                .as_f64()
                .is_some_and(|v| v < *bound),
            CompiledPredicate::Gt(column, bound) => record
                .value(*column)
                .as_f64()
                .is_some_and(|v| v > *bound),
            CompiledPredicate::MonthYearIn(column, allowed) => record
                .value(*column)
                .as_str()
                .is_some_and(|dob| allowed.contains(&month_year(dob))),
            CompiledPredicate::And(all) => all.iter().all(|p| p.matches(record)),
        }
    }
}
