use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path to the JSON file with the traces (will over-write the config file)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Path to the JSON file the peaks are written to (will over-write the config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Minimum wavelet coefficient over peak area ratio
    #[arg(long)]
    pub min_coeff_over_area: Option<f64>,

    /// Drop peaks below this signal to noise ratio
    #[arg(long)]
    pub min_signal_to_noise: Option<f64>,

    /// Pretty print the output JSON
    #[arg(short, long)]
    pub pretty: bool,
}
