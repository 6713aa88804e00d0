use std::path::Path;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::data::aggregate::{
    AggMode, BoxDimension, CategoryBox, GenreCount, GroupedCounts, Kpis, ScatterGroup, SortMode,
    TrendRow, YearHistogram, aggregate_trend, compute_kpis, genre_industry_counts,
    rating_distribution, scatter_groups, top_genre_counts, year_histogram,
};
use crate::data::filter::{FilterState, apply_filters, init_filter_state};
use crate::data::loader;
use crate::data::model::{Movie, MovieDataset};

/// Upper bound on the number of bins in the year histogram.
const YEAR_BINS: usize = 20;

// ---------------------------------------------------------------------------
// Per-chart controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Trend,
    Scatter,
    Box,
    Genre,
    Histograms,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenreStyle {
    #[default]
    Bar,
    Treemap,
}

/// Widget values for every chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartControls {
    pub agg: AggMode,
    pub trend_markers: bool,
    pub log_x: bool,
    pub log_y: bool,
    /// Largest bubble diameter in points.
    pub bubble_size: f32,
    pub box_dim: BoxDimension,
    pub box_points: bool,
    pub top_n: usize,
    pub genre_sort: SortMode,
    pub genre_style: GenreStyle,
}

impl Default for ChartControls {
    fn default() -> Self {
        Self {
            agg: AggMode::Mean,
            trend_markers: true,
            log_x: false,
            log_y: false,
            bubble_size: 10.0,
            box_dim: BoxDimension::Industry,
            box_points: true,
            top_n: 10,
            genre_sort: SortMode::Count,
            genre_style: GenreStyle::Bar,
        }
    }
}

/// Data behind every chart, derived from the filtered view.
#[derive(Debug, Clone, Default)]
pub struct ChartData {
    pub trend: Vec<TrendRow>,
    pub scatter: Vec<ScatterGroup>,
    pub boxes: Vec<CategoryBox>,
    pub genres: Vec<GenreCount>,
    pub genre_hist: GroupedCounts,
    pub year_hist: Option<YearHistogram>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until a file is loaded). Never mutated.
    pub dataset: Option<Arc<MovieDataset>>,

    /// Year window and industry selection.
    pub filters: FilterState,

    /// Movies passing the current filters (cached).
    pub view: Vec<Movie>,

    /// Headline numbers for `view`.
    pub kpis: Kpis,

    pub controls: ChartControls,

    /// Chart inputs for `view` under `controls` (cached).
    pub charts: ChartData,

    pub active_tab: Tab,

    /// Industry colours shared by every chart.
    pub industry_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Load a dataset from disk, reporting failure in the status line.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: MovieDataset) {
        self.filters = init_filter_state(&dataset);
        self.industry_colors = ColorMap::new(&dataset.industries);
        self.dataset = Some(Arc::new(dataset));
        self.status_message = None;
        self.refilter();
    }

    /// Restore the initial filter selection.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters = init_filter_state(ds);
            self.refilter();
        }
    }

    /// Recompute the view and KPIs after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.view = apply_filters(&ds.movies, &self.filters);
        self.kpis = compute_kpis(&self.view);
        log::debug!(
            "Filter {:?} over {} industries selects {} movies",
            self.filters.years,
            self.filters.industries.len(),
            self.view.len()
        );
        self.recompute_charts();
    }

    /// Rebuild chart inputs after a filter or control change.
    pub fn recompute_charts(&mut self) {
        let c = &self.controls;
        self.charts = ChartData {
            trend: aggregate_trend(&self.view, c.agg),
            scatter: scatter_groups(&self.view),
            boxes: rating_distribution(&self.view, c.box_dim),
            genres: top_genre_counts(&self.view, c.top_n, c.genre_sort),
            genre_hist: genre_industry_counts(&self.view),
            year_hist: year_histogram(&self.view, YEAR_BINS),
        };
    }

    /// Recompute chart inputs if `controls` differ from `before`.
    ///
    /// Returns whether anything changed so the caller can schedule a repaint.
    pub fn sync_controls(&mut self, before: &ChartControls) -> bool {
        if self.controls == *before {
            return false;
        }
        log::debug!("Chart controls changed: {:?}", self.controls);
        self.recompute_charts();
        true
    }

    /// Toggle a single industry in the selection.
    pub fn toggle_industry(&mut self, industry: &str) {
        if !self.filters.industries.remove(industry) {
            self.filters.industries.insert(industry.to_string());
        }
        self.refilter();
    }

    /// Select every industry.
    pub fn select_all(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filters.industries = ds.industries.iter().cloned().collect();
            self.refilter();
        }
    }

    /// Deselect every industry.
    pub fn select_none(&mut self) {
        self.filters.industries.clear();
        self.refilter();
    }

    /// Set the year window, keeping `from <= to`.
    pub fn set_years(&mut self, from: i32, to: i32) {
        let years = from.min(to)..=from.max(to);
        if years != self.filters.years {
            self.filters.years = years;
            self.refilter();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::movie;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(MovieDataset::from_movies(vec![
            movie(1990, "Bollywood", Some("Drama"), Some(10.0)),
            movie(2015, "Hollywood", Some("Action|Drama"), Some(20.0)),
            movie(2020, "Hollywood", Some("Comedy"), Some(30.0)),
            movie(2020, "Tollywood", Some("Action"), None),
        ]));
        state
    }

    #[test]
    fn set_dataset_applies_default_window() {
        let state = loaded();
        assert_eq!(state.filters.years, 2010..=2020);
        assert_eq!(state.view.len(), 3);
        assert_eq!(state.kpis.count, 3);
        // the budgetless Tollywood group has no mean
        assert_eq!(state.charts.trend.len(), 2);
    }

    #[test]
    fn toggling_industries_refilters() {
        let mut state = loaded();
        state.toggle_industry("Hollywood");
        assert_eq!(state.view.len(), 1);
        state.toggle_industry("Hollywood");
        assert_eq!(state.view.len(), 3);
    }

    #[test]
    fn empty_selection_yields_placeholder_state() {
        let mut state = loaded();
        state.select_none();
        assert!(state.view.is_empty());
        assert_eq!(state.kpis, Kpis::default());
        assert!(state.charts.trend.is_empty());
        assert!(state.charts.genres.is_empty());
        assert!(state.charts.year_hist.is_none());
        state.select_all();
        assert_eq!(state.view.len(), 3);
    }

    #[test]
    fn set_years_orders_bounds_and_reset_restores() {
        let mut state = loaded();
        state.set_years(2000, 1980);
        assert_eq!(state.filters.years, 1980..=2000);
        assert_eq!(state.view.len(), 1);
        state.reset_filters();
        assert_eq!(state.filters.years, 2010..=2020);
    }

    #[test]
    fn control_changes_apply_on_recompute() {
        let mut state = loaded();
        state.controls.agg = AggMode::Sum;
        state.controls.top_n = 1;
        state.recompute_charts();
        assert_eq!(state.charts.genres.len(), 1);
        let tolly = state
            .charts
            .trend
            .iter()
            .find(|r| r.industry == "Tollywood")
            .expect("sum keeps budgetless groups");
        assert_eq!(tolly.budget, 0.0);
    }

    #[test]
    fn sync_controls_recomputes_only_on_change() {
        let mut state = loaded();
        let before = state.controls.clone();
        assert!(!state.sync_controls(&before));

        state.controls.agg = AggMode::Sum;
        assert!(state.sync_controls(&before));
        assert_eq!(state.charts.trend.len(), 3);
        assert!(!state.sync_controls(&state.controls.clone()));
    }

    #[test]
    fn failed_load_sets_status() {
        let mut state = AppState::default();
        state.load_path(Path::new("missing-file.csv"));
        assert!(state.dataset.is_none());
        assert!(state.status_message.is_some());
    }
}
