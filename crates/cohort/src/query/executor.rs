//! Uniform execution of catalog entries against the dataset.

use std::cmp::Ordering;
use std::time::Instant;

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::DEFAULT_DISPLAY_ROWS;
use crate::dataset::{Dataset, StudentRecord};
use crate::error::QueryError;
use crate::schema::{Column, TableSchema, Value};

use super::aggregate::CompiledAggregate;
use super::catalog::{Catalog, CatalogEntry, OutputKind};
use super::predicate::CompiledPredicate;
use super::result::{QueryOutput, ResultTable};

/// How rows become output rows.
#[derive(Debug)]
enum Shape {
    /// Ungrouped: sort records by schema columns, then project.
    Project {
        columns: Vec<Column>,
        order: Vec<(Column, bool)>,
    },
    /// Grouped: aggregate, then sort output rows by output column index.
    Group {
        keys: Vec<Column>,
        aggregates: Vec<(String, CompiledAggregate)>,
        order: Vec<(usize, bool)>,
    },
}

/// A validated entry, every column resolved.
#[derive(Debug)]
struct Plan {
    filter: Option<CompiledPredicate>,
    shape: Shape,
    limit: Option<usize>,
    display_rows: usize,
}

/// One rendered report section: the entry heading and its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub id: u32,
    pub heading: String,
    #[serde(serialize_with = "serialize_outcome")]
    pub outcome: Result<QueryOutput, QueryError>,
}

fn serialize_outcome<S: serde::Serializer>(
    outcome: &Result<QueryOutput, QueryError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    #[derive(Serialize)]
    #[serde(untagged)]
    enum Outcome<'a> {
        Ok(&'a QueryOutput),
        Err { error: String },
    }

    match outcome {
        Ok(output) => Outcome::Ok(output).serialize(serializer),
        Err(e) => Outcome::Err {
            error: e.to_string(),
        }
        .serialize(serializer),
    }
}

impl Section {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Executes catalog entries over a built dataset.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    schema: TableSchema,
    display_rows: usize,
}

impl QueryExecutor {
    pub fn new() -> Self {
        Self::with_display_rows(DEFAULT_DISPLAY_ROWS)
    }

    /// Rows kept for display when an entry sets no bound of its own.
    pub fn with_display_rows(display_rows: usize) -> Self {
        Self {
            schema: TableSchema::student(),
            display_rows: display_rows.max(1),
        }
    }

    /// Check an entry against the schema without running it.
    pub fn validate(&self, entry: &CatalogEntry) -> Result<(), QueryError> {
        self.plan(entry).map(|_| ())
    }

    /// Run one entry: filter, group/aggregate or project, stable sort, limit,
    /// then bound the rows kept for display.
    pub fn execute(&self, entry: &CatalogEntry, dataset: &Dataset) -> Result<QueryOutput, QueryError> {
        let plan = self.plan(entry)?;

        let rows: Vec<&StudentRecord> = dataset
            .records()
            .iter()
            .filter(|r| plan.filter.as_ref().is_none_or(|f| f.matches(r)))
            .collect();

        let table = match &plan.shape {
            Shape::Project { columns, order } => project(rows, columns, order),
            Shape::Group {
                keys,
                aggregates,
                order,
            } => group(&rows, keys, aggregates, order),
        };
        let table = match plan.limit {
            Some(limit) => table.limited(limit),
            None => table,
        };

        Ok(match &entry.output {
            OutputKind::Table => QueryOutput::Table {
                table: table.truncated(plan.display_rows),
            },
            OutputKind::Scalar { label } => QueryOutput::Scalar {
                label: label.clone(),
                value: table
                    .rows
                    .first()
                    .and_then(|r| r.last())
                    .cloned()
                    .unwrap_or_default(),
            },
            OutputKind::TableWithMinimum { column, label } => {
                let minimum = minimum_row(&table, column);
                QueryOutput::TableWithMinimum {
                    table: table.truncated(plan.display_rows),
                    label: label.clone(),
                    minimum,
                }
            }
        })
    }

    /// Run every entry in catalog order. A failing entry yields a failed
    /// section; the others still run.
    pub fn run(&self, catalog: &Catalog, dataset: &Dataset) -> Vec<Section> {
        catalog
            .entries
            .iter()
            .map(|entry| {
                let started = Instant::now();
                let outcome = self.execute(entry, dataset);
                match &outcome {
                    Ok(_) => log::debug!("query {} finished in {:?}", entry.id, started.elapsed()),
                    Err(e) => log::warn!("{}", e),
                }
                Section {
                    id: entry.id,
                    heading: entry.heading.clone(),
                    outcome,
                }
            })
            .collect()
    }

    fn resolve(&self, entry: u32, name: &str) -> Result<Column, QueryError> {
        self.schema
            .resolve(name)
            .ok_or_else(|| QueryError::UnknownColumn {
                entry,
                column: name.to_string(),
            })
    }

    fn plan(&self, entry: &CatalogEntry) -> Result<Plan, QueryError> {
        let id = entry.id;
        let invalid = |reason: String| QueryError::InvalidEntry { entry: id, reason };

        let filter = entry
            .filter
            .as_ref()
            .map(|p| p.compile(&self.schema, id))
            .transpose()?;

        let shape = if entry.is_grouped() {
            if !entry.select.is_empty() {
                return Err(invalid("select cannot be combined with grouping".to_string()));
            }
            let keys = entry
                .group_by
                .iter()
                .map(|name| self.resolve(id, name))
                .collect::<Result<Vec<_>, _>>()?;
            let aggregates = entry
                .aggregates
                .iter()
                .map(|a| Ok((a.alias().to_string(), a.compile(&self.schema, id)?)))
                .collect::<Result<Vec<_>, QueryError>>()?;

            let output_columns: Vec<&str> = entry
                .group_by
                .iter()
                .map(String::as_str)
                .chain(aggregates.iter().map(|(alias, _)| alias.as_str()))
                .collect();
            let order = entry
                .order_by
                .iter()
                .map(|key| {
                    output_columns
                        .iter()
                        .position(|c| *c == key.column)
                        .map(|index| (index, key.descending))
                        .ok_or_else(|| {
                            invalid(format!(
                                "cannot order by '{}': not a group key or aggregate",
                                key.column
                            ))
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;

            Shape::Group {
                keys,
                aggregates,
                order,
            }
        } else {
            let columns = if entry.select.is_empty() {
                Column::ALL.to_vec()
            } else {
                entry
                    .select
                    .iter()
                    .map(|name| self.resolve(id, name))
                    .collect::<Result<Vec<_>, _>>()?
            };
            let order = entry
                .order_by
                .iter()
                .map(|key| Ok((self.resolve(id, &key.column)?, key.descending)))
                .collect::<Result<Vec<_>, QueryError>>()?;
            Shape::Project { columns, order }
        };

        match (&entry.output, &shape) {
            (OutputKind::Scalar { .. }, Shape::Group { keys, aggregates, .. }) => {
                if !keys.is_empty() || aggregates.len() != 1 {
                    return Err(invalid(
                        "scalar output needs exactly one aggregate and no grouping".to_string(),
                    ));
                }
            }
            (OutputKind::Scalar { .. }, Shape::Project { .. }) => {
                return Err(invalid("scalar output needs an aggregate".to_string()));
            }
            (OutputKind::TableWithMinimum { column, .. }, Shape::Group { aggregates, .. }) => {
                if !aggregates.iter().any(|(alias, _)| alias == column) {
                    return Err(invalid(format!(
                        "minimum column '{}' is not an aggregate",
                        column
                    )));
                }
            }
            (OutputKind::TableWithMinimum { .. }, Shape::Project { .. }) => {
                return Err(invalid("minimum output needs grouping".to_string()));
            }
            (OutputKind::Table, _) => {}
        }

        Ok(Plan {
            filter,
            shape,
            limit: entry.limit,
            display_rows: entry
                .display_rows
                .or(entry.limit)
                .unwrap_or(self.display_rows)
                .max(1),
        })
    }
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

/// Compare with direction: ascending puts nulls first, descending last.
fn directed(a: &Value, b: &Value, descending: bool) -> Ordering {
    if descending {
        b.sort_cmp(a)
    } else {
        a.sort_cmp(b)
    }
}

fn project(
    mut rows: Vec<&StudentRecord>,
    columns: &[Column],
    order: &[(Column, bool)],
) -> ResultTable {
    if !order.is_empty() {
        // `sort_by` is stable: ties keep dataset order.
        rows.sort_by(|a, b| {
            order
                .iter()
                .map(|(column, desc)| directed(&a.value(*column), &b.value(*column), *desc))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        });
    }

    ResultTable::new(
        columns.iter().map(|c| c.name().to_string()).collect(),
        rows.iter()
            .map(|r| columns.iter().map(|c| r.value(*c)).collect())
            .collect(),
    )
}

fn group(
    rows: &[&StudentRecord],
    keys: &[Column],
    aggregates: &[(String, CompiledAggregate)],
    order: &[(usize, bool)],
) -> ResultTable {
    // Groups keep first-appearance order.
    let mut groups: IndexMap<Vec<Value>, Vec<&StudentRecord>> = IndexMap::new();
    if keys.is_empty() {
        groups.insert(Vec::new(), rows.to_vec());
    } else {
        for &record in rows {
            let key: Vec<Value> = keys.iter().map(|c| record.value(*c)).collect();
            groups.entry(key).or_default().push(record);
        }
    }

    let mut output: Vec<Vec<Value>> = groups
        .into_iter()
        .map(|(mut key, members)| {
            key.extend(aggregates.iter().map(|(_, a)| a.evaluate(&members)));
            key
        })
        .collect();

    if !order.is_empty() {
        output.sort_by(|a, b| {
            order
                .iter()
                .map(|(index, desc)| directed(&a[*index], &b[*index], *desc))
                .find(|o| o.is_ne())
                .unwrap_or(Ordering::Equal)
        });
    }

    let columns = keys
        .iter()
        .map(|c| c.name().to_string())
        .chain(aggregates.iter().map(|(alias, _)| alias.clone()))
        .collect();
    ResultTable::new(columns, output)
}

/// The first row holding the smallest value of `column`.
fn minimum_row(table: &ResultTable, column: &str) -> ResultTable {
    let index = table.column_index(column);
    let best = index.and_then(|i| {
        table
            .rows
            .iter()
            .reduce(|best, row| {
                if row[i].sort_cmp(&best[i]) == Ordering::Less {
                    row
                } else {
                    best
                }
            })
            .cloned()
    });
    ResultTable::new(table.columns.clone(), best.into_iter().collect())
}
