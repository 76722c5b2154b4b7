//! Command-line interface.
//!
//! ```bash
//! # Continuous choreography, every frame
//! cdance-processor --input poses.json --name "Salsa Basics"
//!
//! # Key poses with a trained classifier, every other frame
//! cdance-processor --input poses.json --name "Salsa Basics" \
//!     --mode key-poses --training training.json --skip-frames 1
//! ```

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ProcessingMode, ProcessorConfig, DEFAULT_CONFIG_PATH};
use crate::processor::ProcessRequest;

/// Clone Dance choreography processor
#[derive(Parser, Debug)]
#[command(name = "cdance-processor")]
#[command(author, version, about = "Turn an extracted pose sequence into a choreography")]
pub struct Cli {
    /// Pose sequence JSON produced by the landmark extractor
    #[arg(long)]
    pub input: PathBuf,

    /// Choreography name
    #[arg(long)]
    pub name: String,

    /// Output mode (default: from config)
    #[arg(long, value_enum)]
    pub mode: Option<ProcessingMode>,

    /// Training data for the learned classifier tier
    #[arg(long)]
    pub training: Option<PathBuf>,

    /// Source URL recorded in the metadata
    #[arg(long, default_value = "")]
    pub url: String,

    /// Output directory (default: from config)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Frames to skip between kept frames (default: from config)
    #[arg(long)]
    pub skip_frames: Option<usize>,

    /// Config file, created with defaults when missing
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

impl Cli {
    /// Overlay CLI flags on a loaded config.
    pub fn apply(&self, config: ProcessorConfig) -> ProcessorConfig {
        ProcessorConfig {
            mode: self.mode.unwrap_or(config.mode),
            training_data: self.training.clone().or(config.training_data),
            output_dir: self.output_dir.clone().unwrap_or(config.output_dir),
            skip_frames: self.skip_frames.unwrap_or(config.skip_frames),
            ..config
        }
    }

    pub fn request(&self) -> ProcessRequest {
        ProcessRequest {
            input: self.input.clone(),
            name: self.name.clone(),
            source_url: self.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_args() {
        let cli = Cli::try_parse_from(["cdance-processor", "--input", "p.json", "--name", "Demo"])
            .unwrap();
        assert_eq!(cli.config, PathBuf::from("config.json"));
        assert!(cli.mode.is_none());

        let config = cli.apply(ProcessorConfig::default());
        assert_eq!(config, ProcessorConfig::default());
        assert_eq!(cli.request().source_url, "");
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "cdance-processor",
            "--input",
            "p.json",
            "--name",
            "Demo",
            "--mode",
            "key-poses",
            "--skip-frames",
            "2",
            "--output-dir",
            "out",
            "--training",
            "t.json",
        ])
        .unwrap();

        let config = cli.apply(ProcessorConfig::default());
        assert_eq!(config.mode, ProcessingMode::KeyPoses);
        assert_eq!(config.skip_frames, 2);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.training_data, Some(PathBuf::from("t.json")));
    }

    #[test]
    fn test_required_args() {
        assert!(Cli::try_parse_from(["cdance-processor", "--name", "Demo"]).is_err());
        assert!(Cli::try_parse_from(["cdance-processor", "--input", "p.json", "--mode", "frames"])
            .is_err());
    }
}
