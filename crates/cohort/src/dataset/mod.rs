//! Construction of the merged, classified student dataset.
//!
//! The pipeline is a chain of pure steps, each returning a new value:
//! [`DatasetLoader::load`] → [`merge`] → [`classify_all`]. The resulting
//! [`Dataset`] is immutable and shared by every query.

mod classify;
mod join;
mod loader;
mod record;

pub use classify::{
    Classification, MAX_DISCIPLINE_INCIDENTS, MIN_ATTENDANCE_RATE, NO_ACTIVITY, classify,
    classify_all, classify_record,
};
pub use join::{JoinStats, merge};
pub use loader::{DatasetLoader, LoadStats, SourceData};
pub use record::{
    AcademicRecord, AcademicScores, CoreRecord, InternshipDetails, InternshipRecord,
    JoinedRecord, StudentRecord,
};

use indexmap::IndexMap;
use serde::Serialize;

use crate::input::SourceMetadata;
use crate::schema::TableSchema;

/// The merged, classified dataset. Read-only after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    records: Vec<StudentRecord>,
    join_stats: JoinStats,
}

impl Dataset {
    /// Join and classify typed source data.
    pub fn build(data: &SourceData) -> Self {
        let (joined, join_stats) = merge(&data.core, &data.academic, &data.internship);
        let records = classify_all(joined);

        log::info!(
            "Built dataset: {} students ({} dropped by the academic join)",
            records.len(),
            join_stats.dropped_core_rows
        );

        Self {
            records,
            join_stats,
        }
    }

    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn join_stats(&self) -> &JoinStats {
        &self.join_stats
    }

    pub fn schema(&self) -> TableSchema {
        TableSchema::student()
    }

    /// Student count per classification, in label order.
    pub fn classification_counts(&self) -> IndexMap<Classification, usize> {
        let mut counts: IndexMap<Classification, usize> =
            Classification::ALL.iter().map(|c| (*c, 0)).collect();
        for record in &self.records {
            *counts.entry(record.classification()).or_insert(0) += 1;
        }
        counts
    }
}

/// Summary of a built dataset, for provenance output.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub sources: Vec<SourceMetadata>,
    pub load: LoadStats,
    pub join: JoinStats,
    pub classifications: IndexMap<Classification, usize>,
}

impl DatasetSummary {
    pub fn new(data: &SourceData, dataset: &Dataset) -> Self {
        Self {
            sources: data.sources.clone(),
            load: data.stats.clone(),
            join: dataset.join_stats().clone(),
            classifications: dataset.classification_counts(),
        }
    }
}
