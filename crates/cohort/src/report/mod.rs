//! Rendering of report sections.

mod json;
mod table;
mod text;

pub use json::JsonSink;
pub use table::{MAX_CELL_WIDTH, render_table};
pub use text::TextSink;

use std::io;

use crate::dataset::DatasetSummary;
use crate::query::Section;

/// Destination for report sections, called in catalog order.
pub trait ReportSink {
    /// Called once, after the dataset is built and before any section.
    fn begin(&mut self, _summary: &DatasetSummary) -> io::Result<()> {
        Ok(())
    }

    /// Render one section, successful or failed.
    fn section(&mut self, section: &Section) -> io::Result<()>;

    /// Called once after the last section.
    fn finish(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink that keeps sections in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub summary: Option<DatasetSummary>,
    pub sections: Vec<Section>,
    pub finished: bool,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportSink for CollectingSink {
    fn begin(&mut self, summary: &DatasetSummary) -> io::Result<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }

    fn section(&mut self, section: &Section) -> io::Result<()> {
        self.sections.push(section.clone());
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.finished = true;
        Ok(())
    }
}
