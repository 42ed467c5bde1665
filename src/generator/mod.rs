//! Synthetic review generation.
//!
//! Produces a reproducible table of restaurant reviews from a seed. Every
//! random draw comes from one seeded `StdRng`, in a fixed phase order, so the
//! same settings always yield the same table.

use crate::config::GeneratorConfig;
use crate::models::{Aspect, Review, Sentiment};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use thiserror::Error;
use tracing::debug;

/// Errors raised while setting up the generator.
#[derive(Debug, Error, PartialEq)]
pub enum GenerateError {
    #[error("noise standard deviation must be finite and non-negative, got {0}")]
    InvalidNoise(f64),

    #[error("rating range is empty: min {min} > max {max}")]
    InvalidRatingRange { min: u8, max: u8 },

    #[error("invalid review date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorSettings {
    /// Seed for the random number generator.
    pub seed: u64,
    /// Number of reviews to produce.
    pub num_reviews: usize,
    /// Standard deviation of the Gaussian noise added to each rating.
    pub noise_std: f64,
    /// Date stamped on every review.
    pub date: NaiveDate,
    /// Lowest base rating, also the lower clamp bound.
    pub min_rating: u8,
    /// Highest base rating, also the upper clamp bound.
    pub max_rating: u8,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            num_reviews: 200,
            noise_std: 0.5,
            date: NaiveDate::from_ymd_opt(2023, 1, 15).unwrap_or_default(),
            min_rating: 1,
            max_rating: 5,
        }
    }
}

impl TryFrom<&GeneratorConfig> for GeneratorSettings {
    type Error = GenerateError;

    fn try_from(config: &GeneratorConfig) -> Result<Self, Self::Error> {
        let date = NaiveDate::parse_from_str(&config.date, "%Y-%m-%d")
            .map_err(|_| GenerateError::InvalidDate(config.date.clone()))?;

        Ok(Self {
            seed: config.seed,
            num_reviews: config.num_reviews,
            noise_std: config.noise_std,
            date,
            min_rating: config.min_rating,
            max_rating: config.max_rating,
        })
    }
}

/// Seeded generator of synthetic reviews.
#[derive(Debug, Clone)]
pub struct ReviewGenerator {
    settings: GeneratorSettings,
    noise: Normal<f64>,
}

impl ReviewGenerator {
    /// Creates a generator, validating the settings.
    pub fn new(settings: GeneratorSettings) -> Result<Self, GenerateError> {
        if settings.min_rating > settings.max_rating {
            return Err(GenerateError::InvalidRatingRange {
                min: settings.min_rating,
                max: settings.max_rating,
            });
        }

        // Normal::new mirrors a negative std_dev instead of rejecting it.
        if !settings.noise_std.is_finite() || settings.noise_std < 0.0 {
            return Err(GenerateError::InvalidNoise(settings.noise_std));
        }
        let noise = Normal::new(0.0, settings.noise_std)
            .map_err(|_| GenerateError::InvalidNoise(settings.noise_std))?;

        Ok(Self { settings, noise })
    }

    /// Generates the full review table.
    ///
    /// Draw order is fixed: base ratings, record aspects, texts (aspect then
    /// sentiment for each), then noise.
    pub fn generate(&self) -> Vec<Review> {
        let n = self.settings.num_reviews;
        let mut rng = StdRng::seed_from_u64(self.settings.seed);

        let base_ratings: Vec<u8> = (0..n)
            .map(|_| rng.gen_range(self.settings.min_rating..=self.settings.max_rating))
            .collect();

        let aspects: Vec<Aspect> = (0..n).map(|_| pick(&mut rng, &Aspect::ALL)).collect();

        let texts: Vec<String> = (0..n)
            .map(|_| {
                let aspect = pick(&mut rng, &Aspect::ALL);
                let sentiment = pick(&mut rng, &Sentiment::ALL);
                format!("The {} was {}", aspect, sentiment)
            })
            .collect();

        let low = f64::from(self.settings.min_rating);
        let high = f64::from(self.settings.max_rating);

        let reviews: Vec<Review> = base_ratings
            .into_iter()
            .zip(aspects)
            .zip(texts)
            .map(|((base, aspect), text)| {
                let noisy = f64::from(base) + self.noise.sample(&mut rng);
                Review {
                    date: self.settings.date,
                    rating: noisy.clamp(low, high),
                    aspect,
                    text,
                }
            })
            .collect();

        debug!(
            "Generated {} reviews (seed {}, noise std {})",
            reviews.len(),
            self.settings.seed,
            self.settings.noise_std
        );

        reviews
    }
}

/// Uniformly picks one element of a non-empty, fixed-size table.
fn pick<T: Copy, const N: usize>(rng: &mut StdRng, items: &[T; N]) -> T {
    items[rng.gen_range(0..N)]
}
