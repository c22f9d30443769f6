//! CLI binary entry point for realty-pipeline

#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use realty_pipeline::cli::commands::{handle_dry_run, handle_run, handle_validate_config};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "realty-pipeline")]
#[command(about = "Medallion-architecture ETL pipeline for real-estate listings, neighborhoods and Wikipedia context")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline against the destinations named in the config file
    Run {
        /// Path to the pipeline TOML config file
        #[arg(short, long, default_value = "realty-pipeline.toml")]
        config: PathBuf,
    },
    /// Load and validate a config file without running the pipeline
    ValidateConfig {
        /// Path to the pipeline TOML config file
        #[arg(short, long, default_value = "realty-pipeline.toml")]
        config: PathBuf,
    },
    /// Run the pipeline against in-memory fake destinations and the mock
    /// embedding provider, without reaching any network
    DryRun {
        /// Path to the pipeline TOML config file
        #[arg(short, long, default_value = "realty-pipeline.toml")]
        config: PathBuf,
    },
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config } => handle_run(&config).await.map(Some),
        Commands::DryRun { config } => handle_dry_run(&config).await.map(Some),
        Commands::ValidateConfig { config } => handle_validate_config(&config).map(|()| {
            println!("config OK: {}", config.display());
            None
        }),
    };

    match result {
        Ok(Some(report)) => {
            print!("{report}");
            if !report.is_success() {
                std::process::exit(1);
            }
        }
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature is not enabled. Build with --features cli");
    std::process::exit(1);
}
