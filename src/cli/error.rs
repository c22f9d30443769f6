//! CLI-specific error types

use std::path::PathBuf;

use thiserror::Error;

use crate::error::PipelineError;

/// CLI-specific error type. Wraps [`PipelineError`] for anything that
/// happens once a run is underway, and adds the handful of errors that can
/// only occur while parsing arguments or loading a config file.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}
