//! CLI command implementations.

pub mod catalog;
pub mod report;
pub mod sources;

use std::path::PathBuf;

use cohort::PipelineConfig;

/// Config file (if any) with the data directory override applied.
fn pipeline_config(
    data_dir: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let mut pipeline = match config {
        Some(path) => PipelineConfig::load(&path)?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = data_dir {
        pipeline = pipeline.with_data_dir(dir);
    }
    Ok(pipeline)
}
