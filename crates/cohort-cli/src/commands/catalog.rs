//! Catalog command - list or dump the built-in query catalog.

use colored::Colorize;
use cohort::Catalog;
use cohort::query::OutputKind;

pub fn run(json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::builtin();

    if json_output {
        println!("{}", catalog.to_json()?);
        return Ok(());
    }

    println!(
        "{} ({} entries)",
        "Built-in catalog".cyan().bold(),
        catalog.len()
    );
    println!();
    for entry in &catalog.entries {
        let kind = match entry.output {
            OutputKind::Table if entry.is_grouped() => "grouped",
            OutputKind::Table => "rows",
            OutputKind::Scalar { .. } => "scalar",
            OutputKind::TableWithMinimum { .. } => "grouped+min",
        };
        println!(
            "  {:>3}  {:12} {}",
            entry.id.to_string().white().bold(),
            kind.dimmed(),
            entry.heading
        );
    }

    Ok(())
}
