//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Every option is optional: running with no
//! arguments uses the config file (if any) and the built-in defaults.

use clap::Parser;
use std::path::PathBuf;

/// ReviewLens - synthetic restaurant review analyzer
///
/// Generates a reproducible set of restaurant reviews, averages the
/// ratings per aspect and renders a bar chart plus a correlation heatmap.
///
/// Examples:
///   reviewlens
///   reviewlens --seed 7 --count 500
///   reviewlens --output-dir charts --summary summary.md
///   reviewlens --summary summary.json --format json
///   reviewlens --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Random seed for review generation
    ///
    /// Default: from config or 42.
    #[arg(long, env = "REVIEWLENS_SEED")]
    pub seed: Option<u64>,

    /// Number of reviews to generate
    ///
    /// Default: from config or 200.
    #[arg(short = 'n', long, value_name = "COUNT")]
    pub count: Option<usize>,

    /// Standard deviation of the Gaussian rating noise
    #[arg(long, value_name = "STD")]
    pub noise: Option<f64>,

    /// Directory the chart images are written to
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name of the bar chart image
    #[arg(long, value_name = "FILE")]
    pub bar_chart: Option<String>,

    /// File name of the heatmap image
    #[arg(long, value_name = "FILE")]
    pub heatmap: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .reviewlens.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also write an analysis summary to this file
    #[arg(short, long, value_name = "FILE")]
    pub summary: Option<PathBuf>,

    /// Summary format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .reviewlens.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(noise) = self.noise {
            if !noise.is_finite() || noise < 0.0 {
                return Err("Noise must be a non-negative number".to_string());
            }
        }

        for name in [&self.bar_chart, &self.heatmap].into_iter().flatten() {
            if name.trim().is_empty() {
                return Err("Image file names cannot be empty".to_string());
            }
        }

        if let (Some(bar), Some(heat)) = (&self.bar_chart, &self.heatmap) {
            if bar == heat {
                return Err("Bar chart and heatmap must use different file names".to_string());
            }
        }

        if let Some(ref dir) = self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(format!(
                    "Output path is not a directory: {}",
                    dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            seed: None,
            count: None,
            noise: None,
            output_dir: None,
            bar_chart: None,
            heatmap: None,
            config: None,
            summary: None,
            format: OutputFormat::Markdown,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_no_arguments_is_valid() {
        let args = Args::try_parse_from(["reviewlens"]).unwrap();
        assert!(args.validate().is_ok());
        assert_eq!(args.count, None);
        assert_eq!(args.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_parse_overrides() {
        let args = Args::try_parse_from([
            "reviewlens",
            "--seed",
            "7",
            "-n",
            "500",
            "--summary",
            "out.json",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.count, Some(500));
        assert_eq!(args.summary, Some(PathBuf::from("out.json")));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_noise() {
        let mut args = make_args();
        args.noise = Some(-1.0);
        assert!(args.validate().is_err());

        args.noise = Some(0.0);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_same_file_names() {
        let mut args = make_args();
        args.bar_chart = Some("chart.png".to_string());
        args.heatmap = Some("chart.png".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
