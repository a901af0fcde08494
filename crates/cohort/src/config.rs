//! Pipeline configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CohortError, Result};
use crate::input::{DatasetKind, ParserConfig};

/// Rows shown for a table result when the entry sets no explicit limit.
pub const DEFAULT_DISPLAY_ROWS: usize = 5;

/// What to do with a numeric cell that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CastPolicy {
    /// Store null and keep going.
    #[default]
    NullFill,
    /// Abort loading with a cast error.
    FailFast,
}

/// What to do with a StudentID repeated inside one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyPolicy {
    /// Abort loading with a duplicate key error.
    #[default]
    Reject,
    /// Keep duplicates; the join emits every matching pair.
    FanOut,
}

/// File names of the three datasets inside the data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetFiles {
    pub core: String,
    pub academic: String,
    pub internship: String,
}

impl DatasetFiles {
    pub fn file_name(&self, dataset: DatasetKind) -> &str {
        match dataset {
            DatasetKind::Core => &self.core,
            DatasetKind::Academic => &self.academic,
            DatasetKind::Internship => &self.internship,
        }
    }
}

impl Default for DatasetFiles {
    fn default() -> Self {
        Self {
            core: "students_core.csv".to_string(),
            academic: "academic_performance.csv".to_string(),
            internship: "internship_data.csv".to_string(),
        }
    }
}

/// Configuration for a pipeline run.
///
/// Every field has a default, so a JSON config file only needs the keys it
/// wants to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the three CSV files.
    pub data_dir: PathBuf,
    /// File names inside `data_dir`.
    pub files: DatasetFiles,
    /// CSV field delimiter.
    pub delimiter: char,
    /// Numeric coercion policy.
    pub cast_policy: CastPolicy,
    /// Duplicate StudentID policy.
    pub key_policy: KeyPolicy,
    /// Table rows shown when an entry has no explicit limit.
    pub display_rows: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            files: DatasetFiles::default(),
            delimiter: ',',
            cast_policy: CastPolicy::default(),
            key_policy: KeyPolicy::default(),
            display_rows: DEFAULT_DISPLAY_ROWS,
        }
    }
}

impl PipelineConfig {
    /// Read a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CohortError::Config(format!("cannot read '{}': {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if !self.delimiter.is_ascii() {
            return Err(CohortError::Config(format!(
                "delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            )));
        }
        if self.display_rows == 0 {
            return Err(CohortError::Config(
                "display_rows must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn with_cast_policy(mut self, policy: CastPolicy) -> Self {
        self.cast_policy = policy;
        self
    }

    pub fn with_key_policy(mut self, policy: KeyPolicy) -> Self {
        self.key_policy = policy;
        self
    }

    pub fn with_display_rows(mut self, rows: usize) -> Self {
        self.display_rows = rows;
        self
    }

    /// Parser settings derived from this config.
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            delimiter: self.delimiter as u8,
            ..ParserConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"data_dir": "/srv/data", "cast_policy": "fail-fast"}"#)
                .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(config.cast_policy, CastPolicy::FailFast);
        assert_eq!(config.key_policy, KeyPolicy::Reject);
        assert_eq!(config.files.core, "students_core.csv");
        assert_eq!(config.display_rows, DEFAULT_DISPLAY_ROWS);
    }

    #[test]
    fn test_validate_rejects_zero_rows() {
        let config = PipelineConfig::default().with_display_rows(0);
        assert!(matches!(config.validate(), Err(CohortError::Config(_))));
    }

    #[test]
    fn test_parser_config_delimiter() {
        let config = PipelineConfig {
            delimiter: ';',
            ..PipelineConfig::default()
        };
        assert_eq!(config.parser_config().delimiter, b';');
    }
}
