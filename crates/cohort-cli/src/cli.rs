//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Cohort: student risk analytics report
#[derive(Parser)]
#[command(name = "cohort")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load the datasets and print the analytics report
    Report {
        /// Directory holding the three CSV files
        #[arg(short, long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Pipeline config file (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Custom catalog file (JSON) instead of the built-in one
        #[arg(long, value_name = "FILE")]
        catalog: Option<PathBuf>,

        /// Run only these entry ids (e.g. 3,7,12)
        #[arg(long, value_delimiter = ',')]
        only: Vec<u32>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: ReportFormat,

        /// Numeric cast policy (overrides the config file)
        #[arg(long)]
        cast_policy: Option<CastPolicyChoice>,

        /// Keep duplicate StudentIDs instead of rejecting them
        #[arg(long)]
        allow_duplicate_keys: bool,
    },

    /// List the built-in query catalog
    Catalog {
        /// Dump the full catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Load and merge the datasets, then show provenance and counts
    Sources {
        /// Directory holding the three CSV files
        #[arg(short, long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Pipeline config file (JSON)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ReportFormat {
    /// Colored console tables
    Text,
    /// Single JSON document
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CastPolicyChoice {
    /// Unparseable numbers become null
    NullFill,
    /// Unparseable numbers abort the load
    FailFast,
}

impl From<CastPolicyChoice> for cohort::CastPolicy {
    fn from(choice: CastPolicyChoice) -> Self {
        match choice {
            CastPolicyChoice::NullFill => cohort::CastPolicy::NullFill,
            CastPolicyChoice::FailFast => cohort::CastPolicy::FailFast,
        }
    }
}
