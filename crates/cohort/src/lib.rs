//! Cohort: student risk analytics over institutional CSV extracts.
//!
//! Cohort merges three tabular sources describing a student population
//! (demographics, academic performance, internship history), labels each
//! student as At-Risk, High Potential or Average, and answers a catalog of
//! analytic questions against the merged dataset.
//!
//! # Pipeline
//!
//! - **Load**: three CSV files are parsed and typed, with numeric columns
//!   coerced under a configurable cast policy
//! - **Merge**: inner join of core and academic data on `StudentID`, then a
//!   left join of internship data
//! - **Classify**: one label per student from attendance, discipline and
//!   extracurricular activity
//! - **Query**: each catalog entry is filtered, grouped or projected, sorted
//!   and truncated by the same executor
//!
//! # Example
//!
//! ```no_run
//! use cohort::{Catalog, PipelineConfig, Session, TextSink};
//!
//! let mut session = Session::open(PipelineConfig::default().with_data_dir("data")).unwrap();
//! let source = session.csv_source();
//! let mut sink = TextSink::new(std::io::stdout());
//!
//! let report = session
//!     .run_report(&source, &Catalog::builtin(), &mut sink)
//!     .unwrap();
//! println!("Sections: {}", report.sections);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod input;
pub mod query;
pub mod report;
pub mod schema;

mod session;

pub use config::{CastPolicy, DEFAULT_DISPLAY_ROWS, DatasetFiles, KeyPolicy, PipelineConfig};
pub use dataset::{Classification, Dataset, DatasetLoader, DatasetSummary, StudentRecord};
pub use error::{CohortError, LoadError, QueryError, Result};
pub use input::{CsvDirectory, DatasetKind, MemorySource, SourceMetadata, TabularSource};
pub use query::{Catalog, CatalogEntry, QueryExecutor, QueryOutput, ResultTable, Section};
pub use report::{JsonSink, ReportSink, TextSink};
pub use schema::{Column, TableSchema, Value};
pub use session::{ReportSummary, Session, SessionSummary};
