//! Error types for the cohort pipeline.

use std::path::PathBuf;
use thiserror::Error;

use crate::input::DatasetKind;

/// Failure while obtaining or typing one of the three source datasets.
///
/// Any load error is fatal: the pipeline stops before joining.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Resource has no header, no columns or no data rows.
    #[error("Empty {dataset} data: {reason}")]
    EmptyData { dataset: DatasetKind, reason: String },

    /// A required column is absent from the header.
    #[error("{dataset} data is missing required column '{column}'")]
    MissingColumn {
        dataset: DatasetKind,
        column: &'static str,
    },

    /// A numeric cell could not be parsed under the fail-fast cast policy.
    #[error("Cannot cast {dataset} row {row}, column '{column}': '{value}' is not numeric")]
    Cast {
        dataset: DatasetKind,
        row: usize,
        column: &'static str,
        value: String,
    },

    /// A row has a blank StudentID under the fail-fast cast policy.
    #[error("{dataset} row {row} has no StudentID")]
    MissingKey { dataset: DatasetKind, row: usize },

    /// A StudentID occurs more than once within one source.
    #[error("Duplicate StudentID '{key}' in {dataset} data")]
    DuplicateKey { dataset: DatasetKind, key: String },
}

/// Failure of a single catalog entry. Never aborts the rest of the report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Entry references a column that is not part of the merged schema.
    #[error("Query {entry}: unknown column '{column}'")]
    UnknownColumn { entry: u32, column: String },

    /// Averaging a column that is not numeric.
    #[error("Query {entry}: cannot aggregate non-numeric column '{column}'")]
    NonNumericAggregate { entry: u32, column: String },

    /// Structurally invalid entry (bad sort key, scalar with grouping, ...).
    #[error("Query {entry}: {reason}")]
    InvalidEntry { entry: u32, reason: String },
}

/// Main error type for cohort operations.
#[derive(Debug, Error)]
pub enum CohortError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Query(#[from] QueryError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error writing report output.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for cohort operations.
pub type Result<T> = std::result::Result<T, CohortError>;
