//! Declarative query catalog and its executor.
//!
//! Each [`CatalogEntry`] describes one question about the dataset as data:
//! an optional filter, then either a projection or a grouping with
//! aggregates, an ordering and a row limit. [`QueryExecutor`] runs every
//! entry through the same path, so adding a question means adding an entry.

mod aggregate;
mod catalog;
mod executor;
mod predicate;
mod result;

pub use aggregate::{Aggregate, CompiledAggregate, percent_truncated};
pub use catalog::{Catalog, CatalogEntry, OutputKind, SortKey};
pub use executor::{QueryExecutor, Section};
pub use predicate::{CompiledPredicate, Predicate, month_year};
pub use result::{QueryOutput, ResultTable};
