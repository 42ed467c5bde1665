//! Analysis summary generation.
//!
//! Renders an `AnalysisSummary` as Markdown or JSON for the optional
//! `--summary` export.

use super::charts::format_coefficient;
use crate::models::{AnalysisSummary, AspectStats, CorrelationMatrix, Sentiment};
use anyhow::Result;

/// Metadata about the run that produced a summary.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RunInfo {
    pub seed: u64,
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub bar_chart: String,
    pub heatmap: String,
}

/// Generate a complete Markdown summary.
pub fn generate_markdown_summary(summary: &AnalysisSummary, run: &RunInfo) -> String {
    let mut output = String::new();

    output.push_str("# ReviewLens Summary\n\n");
    output.push_str(&generate_run_section(summary, run));
    output.push_str(&generate_aspect_section(&summary.aspects));
    output.push_str(&generate_correlation_section(&summary.correlation));
    output.push_str(&generate_sentiment_section(&summary.sentiment_counts));

    output
}

fn generate_run_section(summary: &AnalysisSummary, run: &RunInfo) -> String {
    let mut section = String::new();

    section.push_str("## Run\n\n");
    section.push_str(&format!("- **Seed:** {}\n", run.seed));
    section.push_str(&format!("- **Reviews:** {}\n", summary.total_reviews));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        run.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Bar chart:** `{}`\n", run.bar_chart));
    section.push_str(&format!("- **Heatmap:** `{}`\n", run.heatmap));
    section.push('\n');

    section
}

/// Generate the per-aspect statistics table.
fn generate_aspect_section(stats: &[AspectStats]) -> String {
    let mut section = String::new();

    section.push_str("## Ratings by Aspect\n\n");
    if stats.is_empty() {
        section.push_str("No reviews were generated.\n\n");
        return section;
    }

    section.push_str("| Aspect | Reviews | Mean | Std |\n");
    section.push_str("|--------|---------|------|-----|\n");
    for s in stats {
        section.push_str(&format!(
            "| {} | {} | {:.3} | {} |\n",
            s.aspect,
            s.count,
            s.mean,
            if s.std.is_nan() {
                "nan".to_string()
            } else {
                format!("{:.3}", s.std)
            }
        ));
    }
    section.push('\n');

    section
}

fn generate_correlation_section(matrix: &CorrelationMatrix) -> String {
    let mut section = String::new();

    section.push_str("## Correlation of Rating Statistics\n\n");
    section.push_str("| |");
    for label in &matrix.labels {
        section.push_str(&format!(" {} |", label));
    }
    section.push('\n');
    section.push_str("|---|");
    section.push_str(&"---|".repeat(matrix.size()));
    section.push('\n');

    for (label, row) in matrix.labels.iter().zip(&matrix.values) {
        section.push_str(&format!("| **{}** |", label));
        for value in row {
            section.push_str(&format!(" {} |", format_coefficient(*value)));
        }
        section.push('\n');
    }
    section.push('\n');

    section
}

fn generate_sentiment_section(counts: &[(Sentiment, usize)]) -> String {
    if counts.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Sentiment in Review Text\n\n");
    for (sentiment, count) in counts {
        section.push_str(&format!("- {}: {}\n", sentiment, count));
    }
    section.push('\n');

    section
}

/// Generate a JSON summary.
pub fn generate_json_summary(summary: &AnalysisSummary, run: &RunInfo) -> Result<String> {
    #[derive(serde::Serialize)]
    struct Document<'a> {
        run: &'a RunInfo,
        summary: &'a AnalysisSummary,
    }

    // NaN is not valid JSON; serde_json writes it as null.
    serde_json::to_string_pretty(&Document { run, summary }).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Aspect;
    use chrono::Utc;

    fn create_test_summary() -> AnalysisSummary {
        AnalysisSummary {
            total_reviews: 3,
            aspects: vec![
                AspectStats {
                    aspect: Aspect::FoodQuality,
                    count: 2,
                    mean: 3.5,
                    std: 0.7071,
                },
                AspectStats {
                    aspect: Aspect::Service,
                    count: 1,
                    mean: 2.0,
                    std: f64::NAN,
                },
            ],
            correlation: CorrelationMatrix {
                labels: vec!["mean".to_string(), "std".to_string()],
                values: vec![vec![1.0, f64::NAN], vec![f64::NAN, f64::NAN]],
            },
            sentiment_counts: vec![(Sentiment::Good, 2), (Sentiment::Poor, 1)],
        }
    }

    fn create_run_info() -> RunInfo {
        RunInfo {
            seed: 42,
            generated_at: Utc::now(),
            bar_chart: "average_rating_by_aspect.png".to_string(),
            heatmap: "correlation_matrix.png".to_string(),
        }
    }

    #[test]
    fn test_generate_markdown_summary() {
        let markdown = generate_markdown_summary(&create_test_summary(), &create_run_info());

        assert!(markdown.contains("# ReviewLens Summary"));
        assert!(markdown.contains("- **Seed:** 42"));
        assert!(markdown.contains("| Food Quality | 2 | 3.500 | 0.707 |"));
        assert!(markdown.contains("| Service | 1 | 2.000 | nan |"));
        assert!(markdown.contains("| **mean** | 1.00 | nan |"));
        assert!(markdown.contains("- good: 2"));
    }

    #[test]
    fn test_empty_aspect_section() {
        let section = generate_aspect_section(&[]);
        assert!(section.contains("No reviews were generated."));
    }

    #[test]
    fn test_generate_json_summary() {
        let json = generate_json_summary(&create_test_summary(), &create_run_info()).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["run"]["seed"], 42);
        assert_eq!(value["summary"]["total_reviews"], 3);
        assert_eq!(value["summary"]["aspects"][0]["aspect"], "Food Quality");
        assert!(value["summary"]["aspects"][1]["std"].is_null());
    }
}
