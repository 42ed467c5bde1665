//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.reviewlens.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".reviewlens.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Review generation settings.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Output file settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Chart rendering settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// Synthetic data settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Random seed.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Number of reviews to generate.
    #[serde(default = "default_num_reviews")]
    pub num_reviews: usize,

    /// Standard deviation of the rating noise.
    #[serde(default = "default_noise_std")]
    pub noise_std: f64,

    /// Date stamped on every review (YYYY-MM-DD).
    #[serde(default = "default_date")]
    pub date: String,

    /// Lowest rating.
    #[serde(default = "default_min_rating")]
    pub min_rating: u8,

    /// Highest rating.
    #[serde(default = "default_max_rating")]
    pub max_rating: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            num_reviews: default_num_reviews(),
            noise_std: default_noise_std(),
            date: default_date(),
            min_rating: default_min_rating(),
            max_rating: default_max_rating(),
        }
    }
}

fn default_seed() -> u64 {
    42
}

fn default_num_reviews() -> usize {
    200
}

fn default_noise_std() -> f64 {
    0.5
}

fn default_date() -> String {
    "2023-01-15".to_string()
}

fn default_min_rating() -> u8 {
    1
}

fn default_max_rating() -> u8 {
    5
}

/// Where the rendered files go.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the images are written to.
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Bar chart file name.
    #[serde(default = "default_bar_chart")]
    pub bar_chart: String,

    /// Heatmap file name.
    #[serde(default = "default_heatmap")]
    pub heatmap: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            bar_chart: default_bar_chart(),
            heatmap: default_heatmap(),
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_bar_chart() -> String {
    "average_rating_by_aspect.png".to_string()
}

fn default_heatmap() -> String {
    "correlation_matrix.png".to_string()
}

impl OutputConfig {
    /// Full path of the bar chart image.
    pub fn bar_chart_path(&self) -> PathBuf {
        self.resolve(&self.bar_chart)
    }

    /// Full path of the heatmap image.
    pub fn heatmap_path(&self) -> PathBuf {
        self.resolve(&self.heatmap)
    }

    /// Paths in the working directory are kept bare (`chart.png`, not `./chart.png`).
    fn resolve(&self, name: &str) -> PathBuf {
        if self.directory.as_os_str().is_empty() || self.directory == Path::new(".") {
            PathBuf::from(name)
        } else {
            self.directory.join(name)
        }
    }
}

/// Image dimensions and fonts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Bar chart size in pixels.
    #[serde(default = "default_bar_width")]
    pub bar_width: u32,
    #[serde(default = "default_bar_height")]
    pub bar_height: u32,

    /// Heatmap size in pixels.
    #[serde(default = "default_heatmap_width")]
    pub heatmap_width: u32,
    #[serde(default = "default_heatmap_height")]
    pub heatmap_height: u32,

    /// Font family for titles and labels.
    #[serde(default = "default_font_family")]
    pub font_family: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            bar_width: default_bar_width(),
            bar_height: default_bar_height(),
            heatmap_width: default_heatmap_width(),
            heatmap_height: default_heatmap_height(),
            font_family: default_font_family(),
        }
    }
}

fn default_bar_width() -> u32 {
    1000
}

fn default_bar_height() -> u32 {
    600
}

fn default_heatmap_width() -> u32 {
    800
}

fn default_heatmap_height() -> u32 {
    600
}

fn default_font_family() -> String {
    "sans-serif".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(seed) = args.seed {
            self.generator.seed = seed;
        }
        if let Some(count) = args.count {
            self.generator.num_reviews = count;
        }
        if let Some(noise) = args.noise {
            self.generator.noise_std = noise;
        }

        if let Some(ref dir) = args.output_dir {
            self.output.directory = dir.clone();
        }
        if let Some(ref name) = args.bar_chart {
            self.output.bar_chart = name.clone();
        }
        if let Some(ref name) = args.heatmap {
            self.output.heatmap = name.clone();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> Result<String> {
        let config = Config::default();
        toml::to_string_pretty(&config).context("Failed to serialize default config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.generator.num_reviews, 200);
        assert_eq!(config.generator.noise_std, 0.5);
        assert_eq!(
            config.output.bar_chart_path(),
            PathBuf::from("average_rating_by_aspect.png")
        );
        assert_eq!(
            config.output.heatmap_path(),
            PathBuf::from("correlation_matrix.png")
        );
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[generator]
seed = 7
num_reviews = 50

[output]
directory = "charts"
heatmap = "corr.png"

[chart]
bar_width = 1200
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.generator.seed, 7);
        assert_eq!(config.generator.num_reviews, 50);
        assert_eq!(config.generator.noise_std, 0.5);
        assert_eq!(config.output.heatmap_path(), PathBuf::from("charts/corr.png"));
        assert_eq!(config.output.bar_chart, "average_rating_by_aspect.png");
        assert_eq!(config.chart.bar_width, 1200);
        assert_eq!(config.chart.bar_height, 600);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[generator]\nseed = 99\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.generator.seed, 99);

        std::fs::write(&path, "[generator\nseed = ").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_merge_with_args_only_overrides_given_values() {
        use clap::Parser;

        let args =
            crate::cli::Args::try_parse_from(["reviewlens", "--seed", "3", "--heatmap", "h.png"])
                .unwrap();
        let mut config = Config::default();
        config.generator.num_reviews = 75;

        config.merge_with_args(&args);

        assert_eq!(config.generator.seed, 3);
        assert_eq!(config.generator.num_reviews, 75);
        assert_eq!(config.output.heatmap, "h.png");
        assert_eq!(config.output.bar_chart, "average_rating_by_aspect.png");
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml().unwrap();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[generator]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("[chart]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.generator.seed, 42);
    }
}
