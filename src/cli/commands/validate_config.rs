//! `validate-config` subcommand: loads and validates a config file without
//! running the pipeline.

use std::path::Path;

use crate::cli::error::CliError;
use crate::config::PipelineConfig;
use crate::error::PipelineError;

pub fn handle_validate_config(config_path: &Path) -> Result<(), CliError> {
    if !config_path.exists() {
        return Err(CliError::ConfigNotFound(config_path.to_path_buf()));
    }
    PipelineConfig::load(config_path).map_err(PipelineError::from)?;
    Ok(())
}
