//! Typing raw source tables into records.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::{CastPolicy, KeyPolicy};
use crate::error::LoadError;
use crate::input::{DataTable, DatasetKind, SourceMetadata, TabularSource};

use super::record::{
    AcademicRecord, AcademicScores, CoreRecord, InternshipDetails, InternshipRecord,
};

/// Counters gathered while loading.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadStats {
    /// Null-filled numeric cells, keyed by `dataset.Column`.
    pub cast_failures: IndexMap<String, usize>,
    /// Rows skipped for a blank StudentID, keyed by dataset.
    #[serde(default)]
    pub keyless_rows: IndexMap<String, usize>,
}

impl LoadStats {
    pub fn total_cast_failures(&self) -> usize {
        self.cast_failures.values().sum()
    }

    pub fn total_keyless_rows(&self) -> usize {
        self.keyless_rows.values().sum()
    }
}

/// The three typed datasets, ready to join.
#[derive(Debug, Clone, Default)]
pub struct SourceData {
    pub core: Vec<CoreRecord>,
    pub academic: Vec<AcademicRecord>,
    pub internship: Vec<InternshipRecord>,
    /// Provenance of file-backed sources.
    pub sources: Vec<SourceMetadata>,
    pub stats: LoadStats,
}

/// Loads and types the three datasets from a tabular source.
#[derive(Debug, Clone, Copy, Default)]
pub struct DatasetLoader {
    cast_policy: CastPolicy,
    key_policy: KeyPolicy,
}

impl DatasetLoader {
    pub fn new(cast_policy: CastPolicy, key_policy: KeyPolicy) -> Self {
        Self {
            cast_policy,
            key_policy,
        }
    }

    /// Load all three datasets. Any failure aborts the whole load.
    pub fn load(&self, source: &dyn TabularSource) -> Result<SourceData, LoadError> {
        log::info!("Loading datasets from {}", source.describe());

        let mut data = SourceData::default();

        for dataset in DatasetKind::ALL {
            let table = source.load(dataset)?;
            log::debug!(
                "{} table: {} rows, {} columns",
                dataset,
                table.row_count(),
                table.column_count()
            );
            let mut reader = TableReader::new(&table, dataset, self.cast_policy)?;

            match dataset {
                DatasetKind::Core => data.core = reader.core_records()?,
                DatasetKind::Academic => data.academic = reader.academic_records()?,
                DatasetKind::Internship => data.internship = reader.internship_records()?,
            }

            for (column, count) in reader.cast_failures {
                data.stats
                    .cast_failures
                    .insert(format!("{}.{}", dataset, column), count);
            }
            if reader.keyless_rows > 0 {
                log::warn!(
                    "{} data: skipped {} rows with no StudentID",
                    dataset,
                    reader.keyless_rows
                );
                data.stats
                    .keyless_rows
                    .insert(dataset.to_string(), reader.keyless_rows);
            }
            if let Some(meta) = table.source {
                data.sources.push(meta);
            }
        }

        if self.key_policy == KeyPolicy::Reject {
            check_unique(DatasetKind::Core, data.core.iter().map(|r| r.student_id.as_str()))?;
            check_unique(
                DatasetKind::Academic,
                data.academic.iter().map(|r| r.student_id.as_str()),
            )?;
            check_unique(
                DatasetKind::Internship,
                data.internship.iter().map(|r| r.student_id.as_str()),
            )?;
        }

        let failures = data.stats.total_cast_failures();
        if failures > 0 {
            log::warn!("{} numeric cells could not be parsed and were set to null", failures);
        }
        log::info!(
            "Loaded {} core, {} academic, {} internship rows",
            data.core.len(),
            data.academic.len(),
            data.internship.len()
        );

        Ok(data)
    }
}

fn check_unique<'a>(
    dataset: DatasetKind,
    keys: impl Iterator<Item = &'a str>,
) -> Result<(), LoadError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(LoadError::DuplicateKey {
                dataset,
                key: key.to_string(),
            });
        }
    }
    Ok(())
}

/// Reads typed cells from a raw table by required column name.
struct TableReader<'a> {
    table: &'a DataTable,
    dataset: DatasetKind,
    cast_policy: CastPolicy,
    indices: HashMap<&'static str, usize>,
    cast_failures: IndexMap<&'static str, usize>,
    keyless_rows: usize,
}

impl<'a> TableReader<'a> {
    fn new(
        table: &'a DataTable,
        dataset: DatasetKind,
        cast_policy: CastPolicy,
    ) -> Result<Self, LoadError> {
        let mut indices = HashMap::new();
        for &column in dataset.required_columns() {
            let index = table
                .column_index(column)
                .ok_or(LoadError::MissingColumn { dataset, column })?;
            indices.insert(column, index);
        }

        Ok(Self {
            table,
            dataset,
            cast_policy,
            indices,
            cast_failures: IndexMap::new(),
            keyless_rows: 0,
        })
    }

    fn raw(&self, row: usize, column: &'static str) -> Option<&'a str> {
        let index = self.indices.get(column)?;
        let value = self.table.get(row, *index)?;
        if DataTable::is_null_value(value) {
            None
        } else {
            Some(value.trim())
        }
    }

    /// The row's StudentID, or `None` when blank. A blank key can never
    /// match in a join, so the row is skipped unless the policy is fail-fast.
    fn key(&mut self, row: usize) -> Result<Option<String>, LoadError> {
        if let Some(key) = self.raw(row, "StudentID") {
            return Ok(Some(key.to_string()));
        }
        if self.cast_policy == CastPolicy::FailFast {
            return Err(LoadError::MissingKey {
                dataset: self.dataset,
                row: row + 1,
            });
        }
        log::debug!("{} row {}: no StudentID, skipping", self.dataset, row + 1);
        self.keyless_rows += 1;
        Ok(None)
    }

    fn text(&self, row: usize, column: &'static str) -> Option<String> {
        self.raw(row, column).map(str::to_string)
    }

    fn cast<T>(
        &mut self,
        row: usize,
        column: &'static str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>, LoadError> {
        let Some(raw) = self.raw(row, column) else {
            return Ok(None);
        };
        if let Some(value) = parse(raw) {
            return Ok(Some(value));
        }

        match self.cast_policy {
            CastPolicy::FailFast => Err(LoadError::Cast {
                dataset: self.dataset,
                row: row + 1,
                column,
                value: raw.to_string(),
            }),
            CastPolicy::NullFill => {
                log::debug!(
                    "{} row {}: '{}' in {} is not numeric, using null",
                    self.dataset,
                    row + 1,
                    raw,
                    column
                );
                *self.cast_failures.entry(column).or_insert(0) += 1;
                Ok(None)
            }
        }
    }

    fn float(&mut self, row: usize, column: &'static str) -> Result<Option<f64>, LoadError> {
        self.cast(row, column, parse_float)
    }

    fn int(&mut self, row: usize, column: &'static str) -> Result<Option<i64>, LoadError> {
        self.cast(row, column, parse_int)
    }

    fn core_records(&mut self) -> Result<Vec<CoreRecord>, LoadError> {
        let mut records = Vec::with_capacity(self.table.row_count());
        for row in 0..self.table.row_count() {
            let Some(student_id) = self.key(row)? else {
                continue;
            };
            records.push(CoreRecord {
                student_id,
                location: self.text(row, "Location"),
                gender: self.text(row, "Gender"),
                grade_level: self.int(row, "GradeLevel")?,
                dob: self.text(row, "DOB"),
                extra_cur_act: self.text(row, "ExtraCurAct"),
                discipline_incidents: self.int(row, "DisciplineIncidents")?,
                school_type: self.text(row, "Public_Private_Charter"),
                socio_economic_status: self.text(row, "SocioEconomicStatus"),
                dropout_status: self.text(row, "DropoutStatus"),
                expected_status: self.text(row, "ExpectedStatus"),
            });
        }
        Ok(records)
    }

    fn academic_records(&mut self) -> Result<Vec<AcademicRecord>, LoadError> {
        let mut records = Vec::with_capacity(self.table.row_count());
        for row in 0..self.table.row_count() {
            let Some(student_id) = self.key(row)? else {
                continue;
            };
            records.push(AcademicRecord {
                student_id,
                scores: AcademicScores {
                    gpa: self.float(row, "GPA")?,
                    attendance_rate: self.float(row, "AttendanceRate")?,
                },
            });
        }
        Ok(records)
    }

    fn internship_records(&mut self) -> Result<Vec<InternshipRecord>, LoadError> {
        let mut records = Vec::with_capacity(self.table.row_count());
        for row in 0..self.table.row_count() {
            let Some(student_id) = self.key(row)? else {
                continue;
            };
            records.push(InternshipRecord {
                student_id,
                details: InternshipDetails {
                    done: self.text(row, "InternshipDone"),
                    company: self.text(row, "InternshipCompany"),
                    location: self.text(row, "InternshipLocation"),
                    role: self.text(row, "InternshipRole"),
                },
            });
        }
        Ok(records)
    }
}

fn parse_float(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok()
}

/// Integers, also accepting a float with no fractional part (`12.0`).
fn parse_int(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}
