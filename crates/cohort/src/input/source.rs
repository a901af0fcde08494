//! Tabular sources: where the three raw datasets come from.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::DatasetFiles;
use crate::error::LoadError;

use super::parser::Parser;

/// The three logical datasets the pipeline integrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Identity and demographics.
    Core,
    /// GPA and attendance.
    Academic,
    /// Internship history.
    Internship,
}

impl DatasetKind {
    /// All datasets in load order.
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Core,
        DatasetKind::Academic,
        DatasetKind::Internship,
    ];

    /// Header columns that must be present in this dataset.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::Core => &[
                "StudentID",
                "Location",
                "Gender",
                "GradeLevel",
                "DOB",
                "ExtraCurAct",
                "DisciplineIncidents",
                "Public_Private_Charter",
                "SocioEconomicStatus",
                "DropoutStatus",
                "ExpectedStatus",
            ],
            DatasetKind::Academic => &["StudentID", "GPA", "AttendanceRate"],
            DatasetKind::Internship => &[
                "StudentID",
                "InternshipDone",
                "InternshipCompany",
                "InternshipLocation",
                "InternshipRole",
            ],
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::Core => write!(f, "core"),
            DatasetKind::Academic => write!(f, "academic"),
            DatasetKind::Internship => write!(f, "internship"),
        }
    }
}

/// Metadata about a source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Which dataset the file provided.
    pub dataset: DatasetKind,
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        dataset: DatasetKind,
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            dataset,
            file,
            path,
            hash,
            size_bytes,
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// Raw tabular data: a header row plus string cells.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data as strings (row-major order).
    pub rows: Vec<Vec<String>>,
    /// Provenance, when the table came from a file.
    pub source: Option<SourceMetadata>,
}

impl DataTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            headers,
            rows,
            source: None,
        }
    }

    /// Attach file provenance.
    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a header, matched exactly after trimming.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(|s| s.as_str()))
    }

    /// Check if a value represents a missing/null value.
    ///
    /// `None` is deliberately not treated as null: it is the "no activity"
    /// sentinel in ExtraCurAct and must survive as a string. `NA`, `N/A` and
    /// `null` are read as missing too, so a literal `N/A` company or location
    /// never forms a group of its own.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("na")
            || trimmed.eq_ignore_ascii_case("n/a")
            || trimmed.eq_ignore_ascii_case("null")
    }
}

/// Produces raw tables for the logical datasets.
pub trait TabularSource {
    /// Load one dataset.
    fn load(&self, dataset: DatasetKind) -> Result<DataTable, LoadError>;

    /// Short description used in log messages.
    fn describe(&self) -> String;
}

/// Reads each dataset from a CSV file in a base directory.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    base: PathBuf,
    files: DatasetFiles,
    parser: Parser,
}

impl CsvDirectory {
    pub fn new(base: impl Into<PathBuf>, files: DatasetFiles) -> Self {
        Self {
            base: base.into(),
            files,
            parser: Parser::new(),
        }
    }

    /// Use a custom parser (e.g. a non-comma delimiter).
    pub fn with_parser(mut self, parser: Parser) -> Self {
        self.parser = parser;
        self
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Full path of the file backing a dataset.
    pub fn path_for(&self, dataset: DatasetKind) -> PathBuf {
        self.base.join(self.files.file_name(dataset))
    }
}

impl TabularSource for CsvDirectory {
    fn load(&self, dataset: DatasetKind) -> Result<DataTable, LoadError> {
        self.parser.parse_file(self.path_for(dataset), dataset)
    }

    fn describe(&self) -> String {
        format!("csv directory {}", self.base.display())
    }
}

/// In-memory source, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    tables: HashMap<DatasetKind, DataTable>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already-built table.
    pub fn with_table(mut self, dataset: DatasetKind, table: DataTable) -> Self {
        self.tables.insert(dataset, table);
        self
    }

    /// Register a dataset from CSV text.
    pub fn with_csv(self, dataset: DatasetKind, csv: &str) -> Result<Self, LoadError> {
        let table = Parser::new().parse_bytes(csv.as_bytes(), dataset, Path::new("<memory>"))?;
        Ok(self.with_table(dataset, table))
    }
}

impl TabularSource for MemorySource {
    fn load(&self, dataset: DatasetKind) -> Result<DataTable, LoadError> {
        self.tables.get(&dataset).cloned().ok_or_else(|| LoadError::Io {
            path: PathBuf::from(format!("<memory>/{}", dataset)),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "dataset not registered"),
        })
    }

    fn describe(&self) -> String {
        format!("in-memory source ({} datasets)", self.tables.len())
    }
}
