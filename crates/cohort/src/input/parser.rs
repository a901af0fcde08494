//! CSV parser producing raw string tables.

use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::LoadError;

use super::source::{DataTable, DatasetKind, SourceMetadata};

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Field delimiter.
    pub delimiter: u8,
    /// Quote character.
    pub quote: u8,
    /// Trim whitespace around fields.
    pub trim: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            trim: true,
        }
    }
}

/// Parses delimited text files with a header row.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file into a table with provenance attached.
    pub fn parse_file(
        &self,
        path: impl AsRef<Path>,
        dataset: DatasetKind,
    ) -> Result<DataTable, LoadError> {
        let path = path.as_ref();

        let contents = fs::read(path).map_err(|e| LoadError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let table = self.parse_bytes(&contents, dataset, path)?;

        let metadata = SourceMetadata::new(
            dataset,
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            table.row_count(),
            table.column_count(),
        );

        Ok(table.with_source(metadata))
    }

    /// Parse bytes directly. `path` is only used for error messages.
    pub fn parse_bytes(
        &self,
        bytes: &[u8],
        dataset: DatasetKind,
        path: &Path,
    ) -> Result<DataTable, LoadError> {
        let csv_err = |source: csv::Error| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter)
            .quote(self.config.quote)
            .has_headers(true)
            .flexible(true)
            .trim(if self.config.trim {
                csv::Trim::All
            } else {
                csv::Trim::None
            })
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|s| s.trim_start_matches('\u{feff}').to_string())
            .collect();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(LoadError::EmptyData {
                dataset,
                reason: "no columns found".to_string(),
            });
        }

        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result.map_err(csv_err)?;
            // Skip blank trailing lines.
            if record.iter().all(|f| f.is_empty()) {
                continue;
            }

            let mut row: Vec<String> = record.iter().map(|s| s.to_string()).collect();
            row.resize(expected_cols, String::new());
            rows.push(row);
        }

        if rows.is_empty() {
            return Err(LoadError::EmptyData {
                dataset,
                reason: "no data rows found".to_string(),
            });
        }

        Ok(DataTable::new(headers, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(data: &str) -> Result<DataTable, LoadError> {
        Parser::new().parse_bytes(data.as_bytes(), DatasetKind::Academic, Path::new("test.csv"))
    }

    #[test]
    fn test_parse_csv() {
        let table = parse("StudentID,GPA,AttendanceRate\nS1,3.2,0.91\nS2,2.5,0.7").unwrap();

        assert_eq!(table.headers, vec!["StudentID", "GPA", "AttendanceRate"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some("S1"));
        assert_eq!(table.get(1, 2), Some("0.7"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = parse("StudentID,GPA,AttendanceRate\nS1,3.2\n").unwrap();
        assert_eq!(table.get(0, 2), Some(""));
    }

    #[test]
    fn test_header_only_is_empty_data() {
        let err = parse("StudentID,GPA,AttendanceRate\n").unwrap_err();
        assert!(matches!(err, LoadError::EmptyData { .. }));
    }

    #[test]
    fn test_empty_input_is_empty_data() {
        let err = parse("").unwrap_err();
        assert!(matches!(err, LoadError::EmptyData { .. }));
    }

    #[test]
    fn test_parse_file_records_metadata() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"StudentID,GPA,AttendanceRate\nS1,3.2,0.91\n")
            .unwrap();

        let table = Parser::new()
            .parse_file(file.path(), DatasetKind::Academic)
            .unwrap();
        let meta = table.source.expect("metadata");

        assert_eq!(meta.row_count, 1);
        assert_eq!(meta.column_count, 3);
        assert!(meta.hash.starts_with("sha256:"));
        assert_eq!(meta.dataset, DatasetKind::Academic);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Parser::new()
            .parse_file("/definitely/not/here.csv", DatasetKind::Core)
            .unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
