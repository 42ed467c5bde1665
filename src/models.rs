//! Data models for the review analyzer.
//!
//! This module contains the core data structures shared by the generator,
//! the aggregator and the renderers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A facet of restaurant quality that a review is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aspect {
    #[serde(rename = "Food Quality")]
    FoodQuality,
    Service,
    Ambiance,
    Value,
    Cleanliness,
}

impl Aspect {
    /// Every aspect, in enumeration order.
    pub const ALL: [Aspect; 5] = [
        Aspect::FoodQuality,
        Aspect::Service,
        Aspect::Ambiance,
        Aspect::Value,
        Aspect::Cleanliness,
    ];

    /// Returns the human-readable label used for grouping and display.
    pub fn label(&self) -> &'static str {
        match self {
            Aspect::FoodQuality => "Food Quality",
            Aspect::Service => "Service",
            Aspect::Ambiance => "Ambiance",
            Aspect::Value => "Value",
            Aspect::Cleanliness => "Cleanliness",
        }
    }

    /// Looks up an aspect by its exact label.
    #[cfg(test)]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.label() == label)
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sentiment adjective embedded in generated review text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Excellent,
    Good,
    Average,
    Poor,
    Terrible,
}

impl Sentiment {
    pub const ALL: [Sentiment; 5] = [
        Sentiment::Excellent,
        Sentiment::Good,
        Sentiment::Average,
        Sentiment::Poor,
        Sentiment::Terrible,
    ];

    pub fn word(&self) -> &'static str {
        match self {
            Sentiment::Excellent => "excellent",
            Sentiment::Good => "good",
            Sentiment::Average => "average",
            Sentiment::Poor => "poor",
            Sentiment::Terrible => "terrible",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.word())
    }
}

/// A single synthetic review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Date the review was written.
    pub date: NaiveDate,
    /// Continuous rating, always within the configured rating range.
    pub rating: f64,
    /// Aspect the review is filed under.
    pub aspect: Aspect,
    /// Free-form review text. May mention a different aspect than `aspect`.
    pub text: String,
}

impl Review {
    /// Returns the sentiment word found at the end of the review text, if any.
    pub fn sentiment(&self) -> Option<Sentiment> {
        let last = self.text.rsplit(' ').next()?;
        Sentiment::ALL.into_iter().find(|s| s.word() == last)
    }
}

/// Rating statistics for one aspect group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectStats {
    /// The aspect these statistics describe.
    pub aspect: Aspect,
    /// Number of reviews in the group.
    pub count: usize,
    /// Mean rating.
    pub mean: f64,
    /// Sample standard deviation (N-1). NaN for single-member groups.
    pub std: f64,
}

/// A square, labeled correlation matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    /// Row and column labels, in order.
    pub labels: Vec<String>,
    /// Row-major coefficients; `values[i][j]` correlates `labels[i]` with `labels[j]`.
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    /// Returns the coefficient for a pair of labels.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        Some(self.values[i][j])
    }
}

/// Everything the aggregator derives from a review table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSummary {
    /// Total number of reviews analyzed.
    pub total_reviews: usize,
    /// Per-aspect statistics, ordered by aspect label.
    pub aspects: Vec<AspectStats>,
    /// Correlation of per-aspect mean and std.
    pub correlation: CorrelationMatrix,
    /// How often each sentiment word appears in review text.
    pub sentiment_counts: Vec<(Sentiment, usize)>,
}
