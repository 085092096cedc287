use ridgepick::DetectionConfig;
use serde::{
    Deserialize,
    Serialize,
};
use std::path::{
    Path,
    PathBuf,
};

use crate::cli::Cli;
use crate::errors::CliError;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    pub input: Option<InputConfig>,
    #[serde(default)]
    pub detection: DetectionConfig,
    pub output: Option<OutputConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct InputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub pretty: bool,
}

impl Config {
    pub fn from_path(path: &Path) -> Result<Self, CliError> {
        let file = std::fs::File::open(path).map_err(|e| CliError::Io {
            source: e.to_string(),
            path: Some(path.to_string_lossy().to_string()),
        })?;
        serde_json::from_reader(std::io::BufReader::new(file)).map_err(|e| CliError::Config {
            source: e.to_string(),
        })
    }

    /// Command line values take precedence over the config file.
    pub fn apply_cli_args(&mut self, args: &Cli) {
        if let Some(input) = &args.input {
            self.input = Some(InputConfig {
                path: input.clone(),
            });
        }
        if let Some(output) = &args.output {
            self.output = Some(OutputConfig {
                path: output.clone(),
                pretty: args.pretty,
            });
        } else if args.pretty {
            if let Some(output) = self.output.as_mut() {
                output.pretty = true;
            }
        }
        if let Some(min_coeff_over_area) = args.min_coeff_over_area {
            self.detection.window.min_coeff_over_area = min_coeff_over_area;
        }
        if let Some(min_signal_to_noise) = args.min_signal_to_noise {
            self.detection.signal_to_noise.min_signal_to_noise = Some(min_signal_to_noise);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config() {
        let config: Config = serde_json::from_str(
            r#"{
                "input": {"path": "traces.json"},
                "detection": {"window": {"peak_width": [0.0, 2.0]}}
            }"#,
        )
        .unwrap();
        assert_eq!(config.input.unwrap().path, PathBuf::from("traces.json"));
        assert!(config.output.is_none());
        assert_eq!(config.detection.window.peak_width, (0.0, 2.0));
        assert_eq!(config.detection.window.min_coeff_over_area, 110.0);
    }

    #[test]
    fn test_cli_overrides() {
        let mut config: Config = serde_json::from_str(
            r#"{"output": {"path": "peaks.json"}, "detection": {"window": {"min_coeff_over_area": 50.0}}}"#,
        )
        .unwrap();
        let args = Cli {
            input: Some(PathBuf::from("other.json")),
            min_signal_to_noise: Some(3.0),
            pretty: true,
            ..Default::default()
        };
        config.apply_cli_args(&args);

        assert_eq!(config.input.unwrap().path, PathBuf::from("other.json"));
        let output = config.output.unwrap();
        assert_eq!(output.path, PathBuf::from("peaks.json"));
        assert!(output.pretty);
        assert_eq!(config.detection.window.min_coeff_over_area, 50.0);
        assert_eq!(
            config.detection.signal_to_noise.min_signal_to_noise,
            Some(3.0)
        );
    }
}
