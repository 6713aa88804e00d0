use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use super::model::{Movie, MovieDataset};

/// Width of the default year window, counted back from the latest year.
const DEFAULT_YEAR_WINDOW: i32 = 10;

// ---------------------------------------------------------------------------
// Filter predicate: year window and industry selection
// ---------------------------------------------------------------------------

/// User-chosen constraints. Both are AND-combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Closed year interval; an inverted range matches nothing.
    pub years: RangeInclusive<i32>,
    /// Industries to keep. Empty means nothing is selected.
    pub industries: BTreeSet<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            years: 0..=0,
            industries: BTreeSet::new(),
        }
    }
}

impl FilterState {
    pub fn new(years: RangeInclusive<i32>, industries: impl IntoIterator<Item = String>) -> Self {
        Self {
            years,
            industries: industries.into_iter().collect(),
        }
    }

    /// Whether a single movie satisfies every constraint.
    pub fn matches(&self, movie: &Movie) -> bool {
        self.years.contains(&movie.year) && self.industries.contains(&movie.industry)
    }
}

/// Initialise a [`FilterState`] with every industry selected and the last
/// decade of the dataset's year span.
pub fn init_filter_state(dataset: &MovieDataset) -> FilterState {
    let years = match dataset.year_bounds {
        Some((lo, hi)) => lo.max(hi.saturating_sub(DEFAULT_YEAR_WINDOW))..=hi,
        None => 0..=0,
    };
    FilterState::new(years, dataset.industries.iter().cloned())
}

/// Return a new view holding the movies that pass `filter`.
///
/// The input is never mutated; an empty result is a valid outcome.
pub fn apply_filters(movies: &[Movie], filter: &FilterState) -> Vec<Movie> {
    movies
        .iter()
        .filter(|m| filter.matches(m))
        .cloned()
        .collect()
}
