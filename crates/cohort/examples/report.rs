//! Example: Run the built-in report over a directory of CSV files.
//!
//! Usage:
//!   cargo run --example report -- <data_dir>
//!
//! Example:
//!   cargo run --example report -- crates/cohort/test_data

use std::env;
use std::io;
use std::path::Path;

use cohort::{Catalog, PipelineConfig, Session, TextSink};

fn main() -> cohort::Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --example report -- <data_dir>");
        eprintln!("\nExample:");
        eprintln!("  cargo run --example report -- crates/cohort/test_data");
        std::process::exit(1);
    }

    let data_dir = Path::new(&args[1]);
    if !data_dir.is_dir() {
        eprintln!("Error: Not a directory: {}", data_dir.display());
        std::process::exit(1);
    }

    let separator = "=".repeat(80);
    println!("{}", separator);
    println!("Cohort Report: {}", data_dir.display());
    println!("{}", separator);
    println!();

    let mut session = Session::open(PipelineConfig::default().with_data_dir(data_dir))?;
    let source = session.csv_source();
    let mut sink = TextSink::new(io::stdout().lock());
    let report = session.run_report(&source, &Catalog::builtin(), &mut sink)?;

    let summary = session.close();
    println!("{}", separator);
    println!("  Students: {}", report.students);
    println!("  Sections: {} ({} failed)", report.sections, report.failed.len());
    for source in &summary.sources {
        println!("  {}: {} rows, {}", source.dataset, source.row_count, source.hash);
    }
    println!("  Duration: {} ms", summary.duration_ms);

    Ok(())
}
