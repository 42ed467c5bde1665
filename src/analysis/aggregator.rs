//! Rating aggregation and statistics.
//!
//! This module groups reviews by aspect, computes per-group statistics and
//! correlates those statistics across aspects.

use crate::models::{AnalysisSummary, Aspect, AspectStats, CorrelationMatrix, Review, Sentiment};
use std::collections::BTreeMap;

/// Group ratings by aspect label.
///
/// Keys are the labels as stored, so iteration order is lexicographic.
pub fn group_by_aspect(reviews: &[Review]) -> BTreeMap<&'static str, (Aspect, Vec<f64>)> {
    let mut grouped: BTreeMap<&'static str, (Aspect, Vec<f64>)> = BTreeMap::new();

    for review in reviews {
        grouped
            .entry(review.aspect.label())
            .or_insert_with(|| (review.aspect, Vec::new()))
            .1
            .push(review.rating);
    }

    grouped
}

/// Arithmetic mean. NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (N-1). NaN with fewer than two values.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}

/// Compute count, mean and sample std for every observed aspect.
pub fn aspect_statistics(reviews: &[Review]) -> Vec<AspectStats> {
    group_by_aspect(reviews)
        .into_values()
        .map(|(aspect, ratings)| AspectStats {
            aspect,
            count: ratings.len(),
            mean: mean(&ratings),
            std: sample_std(&ratings),
        })
        .collect()
}

/// Mean rating per observed aspect, ordered by label.
pub fn average_ratings_by_aspect(reviews: &[Review]) -> Vec<(Aspect, f64)> {
    group_by_aspect(reviews)
        .into_values()
        .map(|(aspect, ratings)| (aspect, mean(&ratings)))
        .collect()
}

/// Pearson correlation over pairwise-complete observations.
///
/// Pairs where either value is NaN are dropped. Returns NaN when fewer than
/// two pairs remain or either side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(&x, &y)| (x, y))
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut ss_x = 0.0;
    let mut ss_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        ss_x += dx * dx;
        ss_y += dy * dy;
    }

    let divisor = (ss_x * ss_y).sqrt();
    if divisor == 0.0 {
        return f64::NAN;
    }

    (cov / divisor).clamp(-1.0, 1.0)
}

/// Correlation matrix over named columns of equal length.
pub fn correlation_matrix(columns: &[(&str, Vec<f64>)]) -> CorrelationMatrix {
    let labels = columns.iter().map(|(name, _)| name.to_string()).collect();
    let values = columns
        .iter()
        .map(|(_, a)| columns.iter().map(|(_, b)| pearson(a, b)).collect())
        .collect();

    CorrelationMatrix { labels, values }
}

/// Correlate per-aspect mean and std across aspects (2x2 matrix).
pub fn statistics_correlation(stats: &[AspectStats]) -> CorrelationMatrix {
    let means: Vec<f64> = stats.iter().map(|s| s.mean).collect();
    let stds: Vec<f64> = stats.iter().map(|s| s.std).collect();

    correlation_matrix(&[("mean", means), ("std", stds)])
}

/// Count sentiment words found in review text.
pub fn sentiment_distribution(reviews: &[Review]) -> Vec<(Sentiment, usize)> {
    let mut counts: BTreeMap<Sentiment, usize> = BTreeMap::new();

    for sentiment in reviews.iter().filter_map(Review::sentiment) {
        *counts.entry(sentiment).or_default() += 1;
    }

    counts.into_iter().collect()
}

/// Run every aggregation over a review table.
pub fn analyze(reviews: &[Review]) -> AnalysisSummary {
    let aspects = aspect_statistics(reviews);
    let correlation = statistics_correlation(&aspects);

    AnalysisSummary {
        total_reviews: reviews.len(),
        aspects,
        correlation,
        sentiment_counts: sentiment_distribution(reviews),
    }
}
