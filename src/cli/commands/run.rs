//! `run` subcommand: executes the pipeline against the configured
//! destinations.

use std::path::Path;

use crate::cli::error::CliError;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline;
use crate::report::RunReport;

pub async fn handle_run(config_path: &Path) -> Result<RunReport, CliError> {
    if !config_path.exists() {
        return Err(CliError::ConfigNotFound(config_path.to_path_buf()));
    }
    let config = PipelineConfig::load(config_path).map_err(PipelineError::from)?;
    Ok(pipeline::run(&config).await)
}
