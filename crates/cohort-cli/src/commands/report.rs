//! Report command - run the pipeline and print every catalog section.

use std::io;
use std::path::PathBuf;

use colored::Colorize;
use cohort::report::render_table;
use cohort::{
    Catalog, DatasetSummary, JsonSink, KeyPolicy, QueryOutput, ReportSink, Section, Session,
};

use crate::cli::{CastPolicyChoice, ReportFormat};

pub struct ReportArgs {
    pub data_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub catalog: Option<PathBuf>,
    pub only: Vec<u32>,
    pub format: ReportFormat,
    pub cast_policy: Option<CastPolicyChoice>,
    pub allow_duplicate_keys: bool,
}

pub fn run(args: ReportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = super::pipeline_config(args.data_dir, args.config)?;
    if let Some(policy) = args.cast_policy {
        config = config.with_cast_policy(policy.into());
    }
    if args.allow_duplicate_keys {
        config = config.with_key_policy(KeyPolicy::FanOut);
    }

    let mut catalog = match args.catalog {
        Some(path) => Catalog::load(&path)?,
        None => Catalog::builtin(),
    };
    if !args.only.is_empty() {
        catalog = catalog.only(&args.only)?;
    }

    let mut session = Session::open(config)?;
    let source = session.csv_source();

    let report = match args.format {
        ReportFormat::Text => {
            let mut sink = ConsoleSink::new();
            session.run_report(&source, &catalog, &mut sink)?
        }
        ReportFormat::Json => {
            let mut sink = JsonSink::new(io::stdout().lock());
            session.run_report(&source, &catalog, &mut sink)?
        }
    };

    let summary = session.close();
    log::info!(
        "{} sections for {} students in {} ms",
        report.sections,
        report.students,
        summary.duration_ms
    );

    Ok(())
}

/// Colored console rendering of report sections.
struct ConsoleSink {
    failed: usize,
}

impl ConsoleSink {
    fn new() -> Self {
        Self { failed: 0 }
    }
}

impl ReportSink for ConsoleSink {
    fn begin(&mut self, summary: &DatasetSummary) -> io::Result<()> {
        let students: usize = summary.classifications.values().sum();
        println!(
            "{} {} students",
            "Report for".cyan().bold(),
            students.to_string().white().bold()
        );
        println!();
        Ok(())
    }

    fn section(&mut self, section: &Section) -> io::Result<()> {
        println!("{}", section.heading.yellow().bold());
        match &section.outcome {
            Ok(QueryOutput::Table { table }) => print!("{}", render_table(table)),
            Ok(QueryOutput::Scalar { label, value }) => {
                println!("{}: {}", label, value.to_string().white().bold());
            }
            Ok(QueryOutput::TableWithMinimum {
                table,
                label,
                minimum,
            }) => {
                print!("{}", render_table(table));
                println!();
                println!("{}", label.yellow());
                print!("{}", render_table(minimum));
            }
            Err(e) => {
                self.failed += 1;
                println!("{} {}", "Error:".red().bold(), e);
            }
        }
        println!();
        Ok(())
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.failed == 0 {
            println!("{}", "All sections completed.".green());
        } else {
            println!(
                "{}",
                format!("{} section(s) failed.", self.failed).red().bold()
            );
        }
        Ok(())
    }
}
