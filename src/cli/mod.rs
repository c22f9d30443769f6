//! CLI support types shared with the `realty-pipeline` binary
//! (`src/cli/main.rs`).

pub mod commands;
pub mod error;

pub use error::CliError;
