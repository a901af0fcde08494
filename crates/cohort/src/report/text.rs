//! Plain-text report output.

use std::io::{self, Write};

use crate::query::{QueryOutput, Section};

use super::ReportSink;
use super::table::render_table;

/// Writes each section as its heading followed by a bordered table or a
/// `label: value` line.
pub struct TextSink<W: Write> {
    out: W,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportSink for TextSink<W> {
    fn section(&mut self, section: &Section) -> io::Result<()> {
        writeln!(self.out, "{}", section.heading)?;
        match &section.outcome {
            Ok(QueryOutput::Table { table }) => {
                write!(self.out, "{}", render_table(table))?;
            }
            Ok(QueryOutput::Scalar { label, value }) => {
                writeln!(self.out, "{}: {}", label, value)?;
            }
            Ok(QueryOutput::TableWithMinimum {
                table,
                label,
                minimum,
            }) => {
                write!(self.out, "{}", render_table(table))?;
                writeln!(self.out)?;
                writeln!(self.out, "{}", label)?;
                write!(self.out, "{}", render_table(minimum))?;
            }
            Err(e) => {
                writeln!(self.out, "Error: {}", e)?;
            }
        }
        writeln!(self.out)
    }

    fn finish(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}
