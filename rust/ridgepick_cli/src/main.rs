mod cli;
mod config;
mod errors;
mod input;
mod processing;

use clap::Parser;
use ridgepick::PeakDetector;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::Config;

#[cfg(target_os = "windows")]
use mimalloc::MiMalloc;

#[cfg(target_os = "windows")]
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> std::result::Result<(), errors::CliError> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        ) // This uses RUST_LOG environment variable
        .init();

    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    config.apply_cli_args(&args);

    let input_config = config.input.clone().ok_or(errors::CliError::Config {
        source: "No input provided, please provide one in either the config file or with the --input flag".to_string(),
    })?;
    let output_config = config.output.clone().ok_or(errors::CliError::Config {
        source: "No output provided, please provide one in either the config file or with the --output flag".to_string(),
    })?;
    info!("Parsed configuration: {:#?}", config);

    let document = processing::read_traces(&input_config.path)?;
    let detector = PeakDetector::new(config.detection);
    let peaks = processing::process_traces(document, &detector);
    processing::write_peaks(&peaks, &output_config)?;

    Ok(())
}
