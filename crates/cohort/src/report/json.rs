//! JSON report output.

use std::io::{self, Write};

use serde::Serialize;

use crate::dataset::DatasetSummary;
use crate::query::Section;

use super::ReportSink;

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<&'a DatasetSummary>,
    sections: &'a [Section],
}

/// Buffers sections and writes a single pretty-printed document on finish.
pub struct JsonSink<W: Write> {
    out: W,
    summary: Option<DatasetSummary>,
    sections: Vec<Section>,
}

impl<W: Write> JsonSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            summary: None,
            sections: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn begin(&mut self, summary: &DatasetSummary) -> io::Result<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }

    fn section(&mut self, section: &Section) -> io::Result<()> {
        self.sections.push(section.clone());
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        let report = JsonReport {
            summary: self.summary.as_ref(),
            sections: &self.sections,
        };
        serde_json::to_writer_pretty(&mut self.out, &report)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
