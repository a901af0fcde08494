//! Cohort CLI - student risk analytics report.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use env_logger::Env;

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    let result = match cli.command {
        Commands::Report {
            data_dir,
            config,
            catalog,
            only,
            format,
            cast_policy,
            allow_duplicate_keys,
        } => commands::report::run(commands::report::ReportArgs {
            data_dir,
            config,
            catalog,
            only,
            format,
            cast_policy,
            allow_duplicate_keys,
        }),

        Commands::Catalog { json } => commands::catalog::run(json),

        Commands::Sources {
            data_dir,
            config,
            json,
        } => commands::sources::run(data_dir, config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
