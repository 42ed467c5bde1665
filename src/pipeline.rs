//! The generate → aggregate → render pipeline.

use crate::analysis;
use crate::cli::OutputFormat;
use crate::config::Config;
use crate::generator::{GeneratorSettings, ReviewGenerator};
use crate::models::AnalysisSummary;
use crate::report::charts::format_coefficient;
use crate::report::{self, RunInfo};
use anyhow::{Context, Result};
use chrono::Utc;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub summary: AnalysisSummary,
    pub bar_chart: PathBuf,
    pub heatmap: PathBuf,
    pub seed: u64,
}

impl PipelineOutput {
    /// Run metadata for summary exports.
    pub fn run_info(&self) -> RunInfo {
        RunInfo {
            seed: self.seed,
            generated_at: Utc::now(),
            bar_chart: self.bar_chart.display().to_string(),
            heatmap: self.heatmap.display().to_string(),
        }
    }
}

/// Run every stage once.
///
/// Writes one `Plot saved to <path>` line to `out` after each image.
pub fn run<W: Write>(config: &Config, out: &mut W) -> Result<PipelineOutput> {
    let settings =
        GeneratorSettings::try_from(&config.generator).context("Invalid generator settings")?;
    let seed = settings.seed;
    let generator = ReviewGenerator::new(settings).context("Invalid generator settings")?;

    let reviews = generator.generate();
    info!("Generated {} synthetic reviews (seed {})", reviews.len(), seed);

    let averages = analysis::average_ratings_by_aspect(&reviews);
    let summary = analysis::analyze(&reviews);
    for stats in &summary.aspects {
        debug!(
            "{}: n={} mean={:.3} std={:.3}",
            stats.aspect, stats.count, stats.mean, stats.std
        );
    }
    if let Some(r) = summary.correlation.get("mean", "std") {
        debug!("mean/std correlation across aspects: {}", format_coefficient(r));
    }

    if !config.output.directory.as_os_str().is_empty() {
        std::fs::create_dir_all(&config.output.directory).with_context(|| {
            format!(
                "Failed to create output directory {}",
                config.output.directory.display()
            )
        })?;
    }

    let bar_chart = config.output.bar_chart_path();
    report::render_bar_chart(&averages, &bar_chart, &config.chart)
        .with_context(|| format!("Failed to render bar chart to {}", bar_chart.display()))?;
    writeln!(out, "Plot saved to {}", bar_chart.display())?;

    let heatmap = config.output.heatmap_path();
    report::render_heatmap(&summary.correlation, &heatmap, &config.chart)
        .with_context(|| format!("Failed to render heatmap to {}", heatmap.display()))?;
    writeln!(out, "Plot saved to {}", heatmap.display())?;

    Ok(PipelineOutput {
        summary,
        bar_chart,
        heatmap,
        seed,
    })
}

/// Write the analysis summary in the requested format.
pub fn write_summary(output: &PipelineOutput, path: &Path, format: OutputFormat) -> Result<()> {
    let run = output.run_info();
    let content = match format {
        OutputFormat::Json => report::generate_json_summary(&output.summary, &run)?,
        OutputFormat::Markdown => report::generate_markdown_summary(&output.summary, &run),
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write summary to {}", path.display()))?;
    info!("Summary saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> Config {
        let mut config = Config::default();
        config.output.directory = dir.to_path_buf();
        config
    }

    #[test]
    fn test_end_to_end_writes_two_images_and_two_lines() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut out = Vec::new();

        let output = run(&config, &mut out).unwrap();

        let bar = dir.path().join("average_rating_by_aspect.png");
        let heat = dir.path().join("correlation_matrix.png");
        assert!(bar.is_file());
        assert!(heat.is_file());

        let stdout = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = stdout.lines().collect();
        assert_eq!(
            lines,
            vec![
                format!("Plot saved to {}", bar.display()),
                format!("Plot saved to {}", heat.display()),
            ]
        );

        assert_eq!(output.summary.total_reviews, 200);
        assert_eq!(output.summary.correlation.size(), 2);
    }

    #[test]
    fn test_creates_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("charts").join("run1");
        let mut config = config_in(&nested);
        config.generator.num_reviews = 20;

        run(&config, &mut std::io::sink()).unwrap();
        assert!(nested.join("correlation_matrix.png").is_file());
    }

    #[test]
    fn test_runs_are_reproducible() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());

        let first = run(&config, &mut std::io::sink()).unwrap();
        let second = run(&config, &mut std::io::sink()).unwrap();
        assert_eq!(first.summary.aspects, second.summary.aspects);
    }

    #[test]
    fn test_invalid_date_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.generator.date = "not-a-date".to_string();
        let mut out = Vec::new();

        let err = run(&config, &mut out).unwrap_err();
        assert!(err.to_string().contains("Invalid generator settings"));
        assert!(out.is_empty());
        assert!(!dir.path().join("average_rating_by_aspect.png").exists());
    }

    #[test]
    fn test_negative_noise_from_config_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.generator.noise_std = -3.0;
        let mut out = Vec::new();

        let err = run(&config, &mut out).unwrap_err();
        assert!(err.to_string().contains("Invalid generator settings"));
        assert!(out.is_empty());
        assert!(!dir.path().join("average_rating_by_aspect.png").exists());
        assert!(!dir.path().join("correlation_matrix.png").exists());
    }

    #[test]
    fn test_write_summary_formats() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.generator.num_reviews = 30;
        let output = run(&config, &mut std::io::sink()).unwrap();

        let md = dir.path().join("summary.md");
        write_summary(&output, &md, OutputFormat::Markdown).unwrap();
        assert!(std::fs::read_to_string(&md)
            .unwrap()
            .contains("## Ratings by Aspect"));

        let json = dir.path().join("summary.json");
        write_summary(&output, &json, OutputFormat::Json).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(value["summary"]["total_reviews"], 30);
    }
}
