use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::Deserialize;

/// Placeholder genre for rows whose Genre cell is missing.
pub const UNKNOWN_GENRE: &str = "Unknown";

/// Placeholder used when a Language cell is missing.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Release years accepted by the loader. Anything outside is a data error.
pub const YEAR_LIMITS: RangeInclusive<i32> = 1800..=2200;

/// Text columns; JSON writers sometimes emit these as bare numbers.
pub const TEXT_COLUMNS: [&str; 4] = ["Name", "Industry", "Genre", "Language"];

/// Column names every dataset must provide.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "Name", "Year", "Industry", "Genre", "Rating", "Budget", "Duration", "Language",
];

// ---------------------------------------------------------------------------
// Movie – one row of the merged dataset
// ---------------------------------------------------------------------------

/// A single movie record.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub name: String,
    pub year: i32,
    pub industry: String,
    /// Raw genre cell, possibly multi-valued (`Action|Drama`).
    pub genre: Option<String>,
    pub rating: Option<f64>,
    /// Budget in currency units.
    pub budget: Option<f64>,
    /// Runtime in minutes.
    pub duration: Option<f64>,
    pub language: Option<String>,
}

impl Movie {
    /// Language label with the missing value mapped to a placeholder.
    pub fn language_label(&self) -> &str {
        self.language.as_deref().unwrap_or(UNKNOWN_LANGUAGE)
    }
}

// ---------------------------------------------------------------------------
// RawMovie – a row as read from disk, before validation
// ---------------------------------------------------------------------------

/// Row shape shared by the CSV, JSON and Parquet readers.
///
/// Unparseable numeric cells deserialize to `None` instead of failing the
/// whole file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMovie {
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Year", default, deserialize_with = "csv::invalid_option")]
    pub year: Option<f64>,
    #[serde(rename = "Industry", default)]
    pub industry: Option<String>,
    #[serde(rename = "Genre", default)]
    pub genre: Option<String>,
    #[serde(rename = "Rating", default, deserialize_with = "csv::invalid_option")]
    pub rating: Option<f64>,
    #[serde(rename = "Budget", default, deserialize_with = "csv::invalid_option")]
    pub budget: Option<f64>,
    #[serde(rename = "Duration", default, deserialize_with = "csv::invalid_option")]
    pub duration: Option<f64>,
    #[serde(rename = "Language", default)]
    pub language: Option<String>,
}

impl RawMovie {
    /// Validate into a [`Movie`]. Rows without a Year inside [`YEAR_LIMITS`]
    /// or a non-empty Industry are rejected.
    pub fn into_movie(self) -> Option<Movie> {
        let year = self.year?.trunc();
        if !(*YEAR_LIMITS.start() as f64..=*YEAR_LIMITS.end() as f64).contains(&year) {
            return None;
        }
        let year = year as i32;
        let industry = non_empty(self.industry)?;
        Some(Movie {
            name: self.name.unwrap_or_default(),
            year,
            industry,
            genre: non_empty(self.genre),
            rating: self.rating.filter(|v| v.is_finite()),
            budget: self.budget.filter(|v| v.is_finite()),
            duration: self.duration.filter(|v| v.is_finite()),
            language: non_empty(self.language),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// MovieDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed filter domains.
#[derive(Debug, Clone, Default)]
pub struct MovieDataset {
    /// All movies (rows), in file order.
    pub movies: Vec<Movie>,
    /// Sorted unique industry labels.
    pub industries: Vec<String>,
    /// Smallest and largest year present, `None` for an empty dataset.
    pub year_bounds: Option<(i32, i32)>,
}

impl MovieDataset {
    /// Build the filter domains from the loaded movies.
    pub fn from_movies(movies: Vec<Movie>) -> Self {
        let industries: BTreeSet<&str> = movies.iter().map(|m| m.industry.as_str()).collect();
        let industries = industries.into_iter().map(str::to_string).collect();

        let year_bounds = movies.iter().map(|m| m.year).fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        });

        MovieDataset {
            movies,
            industries,
            year_bounds,
        }
    }

    /// Number of movies.
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
