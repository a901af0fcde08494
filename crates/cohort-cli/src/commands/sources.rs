//! Sources command - load and merge, then show provenance and counts.

use std::path::PathBuf;

use colored::Colorize;
use cohort::Session;

pub fn run(
    data_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    json_output: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::pipeline_config(data_dir, config)?;
    let mut session = Session::open(config)?;
    let source = session.csv_source();
    let (_, summary) = session.build_dataset(&source)?;
    session.close();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Sources:".cyan().bold());
    for meta in &summary.sources {
        println!(
            "  {:11} {} ({} rows, {} columns, {} bytes)",
            meta.dataset.to_string().white().bold(),
            meta.path.display(),
            meta.row_count,
            meta.column_count,
            meta.size_bytes
        );
        println!("  {:11} sha256 {}", "", meta.hash.dimmed());
    }
    println!();

    let join = &summary.join;
    println!("{}", "Join:".cyan().bold());
    println!(
        "  core {}, academic {}, internship {}",
        join.core_rows, join.academic_rows, join.internship_rows
    );
    println!(
        "  merged {} (dropped {} core rows without academic data, {} without internship)",
        join.merged_rows.to_string().white().bold(),
        join.dropped_core_rows.to_string().yellow(),
        join.without_internship
    );

    let cast_failures = summary.load.total_cast_failures();
    if cast_failures > 0 {
        println!();
        println!(
            "{} {} numeric cells could not be parsed and were set to null",
            "Warning:".yellow().bold(),
            cast_failures
        );
        for (column, count) in &summary.load.cast_failures {
            println!("  {:24} {}", column, count);
        }
    }

    let keyless = summary.load.total_keyless_rows();
    if keyless > 0 {
        println!();
        println!(
            "{} {} rows had no StudentID and were skipped",
            "Warning:".yellow().bold(),
            keyless
        );
        for (dataset, count) in &summary.load.keyless_rows {
            println!("  {:24} {}", dataset, count);
        }
    }

    println!();
    println!("{}", "Classifications:".cyan().bold());
    for (classification, count) in &summary.classifications {
        println!("  {:16} {}", classification.label(), count.to_string().white().bold());
    }

    Ok(())
}
