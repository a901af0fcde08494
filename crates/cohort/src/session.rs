//! Explicit pipeline context: configuration, provenance and timing for one run.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::PipelineConfig;
use crate::dataset::{Dataset, DatasetLoader, DatasetSummary};
use crate::error::Result;
use crate::input::{CsvDirectory, Parser, SourceMetadata, TabularSource};
use crate::query::{Catalog, QueryExecutor};
use crate::report::ReportSink;

/// Outcome counts of one report run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Students in the merged dataset.
    pub students: usize,
    /// Sections handed to the sink.
    pub sections: usize,
    /// Ids of entries that failed.
    pub failed: Vec<u32>,
}

impl ReportSummary {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// What a session did, returned when it is closed.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub duration_ms: i64,
    pub sources: Vec<SourceMetadata>,
    pub reports: Vec<ReportSummary>,
}

/// A pipeline run. Open it with a config, build the dataset and run reports,
/// then close it to get the run summary.
#[derive(Debug)]
pub struct Session {
    config: PipelineConfig,
    opened_at: DateTime<Utc>,
    sources: Vec<SourceMetadata>,
    reports: Vec<ReportSummary>,
}

impl Session {
    /// Validate the configuration and start a session.
    pub fn open(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        log::info!(
            "Session opened (data dir: {}, cast policy: {:?}, key policy: {:?})",
            config.data_dir.display(),
            config.cast_policy,
            config.key_policy
        );
        Ok(Self {
            config,
            opened_at: Utc::now(),
            sources: Vec::new(),
            reports: Vec::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// The CSV directory described by the config.
    pub fn csv_source(&self) -> CsvDirectory {
        CsvDirectory::new(self.config.data_dir.clone(), self.config.files.clone())
            .with_parser(Parser::with_config(self.config.parser_config()))
    }

    pub fn loader(&self) -> DatasetLoader {
        DatasetLoader::new(self.config.cast_policy, self.config.key_policy)
    }

    pub fn executor(&self) -> QueryExecutor {
        QueryExecutor::with_display_rows(self.config.display_rows)
    }

    /// Load, join and classify. Records source provenance on the session.
    pub fn build_dataset(&mut self, source: &dyn TabularSource) -> Result<(Dataset, DatasetSummary)> {
        let data = self.loader().load(source)?;
        let dataset = Dataset::build(&data);
        let summary = DatasetSummary::new(&data, &dataset);
        self.sources.extend(data.sources);
        Ok((dataset, summary))
    }

    /// Build the dataset and render every catalog entry to the sink.
    ///
    /// A load failure returns before the sink sees anything. Failing entries
    /// are rendered as failed sections and listed in the summary.
    pub fn run_report(
        &mut self,
        source: &dyn TabularSource,
        catalog: &Catalog,
        sink: &mut dyn ReportSink,
    ) -> Result<ReportSummary> {
        let (dataset, summary) = self.build_dataset(source)?;

        sink.begin(&summary)?;
        let sections = self.executor().run(catalog, &dataset);
        for section in &sections {
            sink.section(section)?;
        }
        sink.finish()?;

        let report = ReportSummary {
            students: dataset.len(),
            sections: sections.len(),
            failed: sections.iter().filter(|s| !s.is_ok()).map(|s| s.id).collect(),
        };
        if report.is_complete() {
            log::info!("Report complete: {} sections", report.sections);
        } else {
            log::warn!(
                "Report finished with {} failed section(s): {:?}",
                report.failed.len(),
                report.failed
            );
        }
        self.reports.push(report.clone());
        Ok(report)
    }

    /// End the session.
    pub fn close(self) -> SessionSummary {
        let closed_at = Utc::now();
        let duration_ms = (closed_at - self.opened_at).num_milliseconds();
        log::info!("Session closed after {} ms", duration_ms);
        SessionSummary {
            opened_at: self.opened_at,
            closed_at,
            duration_ms,
            sources: self.sources,
            reports: self.reports,
        }
    }
}
