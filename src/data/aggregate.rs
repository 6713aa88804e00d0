use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::format::{PLACEHOLDER, format_currency};
use super::genre::explode_genres;
use super::model::Movie;
use super::stats::{BoxSummary, box_summary, median, value_counts};

/// A chart control received a value outside its option list.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}'")]
pub struct ParseModeError {
    kind: &'static str,
    value: String,
}

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Headline statistics for the current selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kpis {
    pub count: usize,
    pub median_rating: Option<f64>,
    pub median_budget: Option<f64>,
    pub top_genre: Option<String>,
}

impl Kpis {
    pub fn count_label(&self) -> String {
        self.count.to_string()
    }

    pub fn rating_label(&self) -> String {
        self.median_rating
            .map(|r| format!("{r:.2}"))
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    pub fn budget_label(&self) -> String {
        format_currency(&self.median_budget)
    }

    pub fn top_genre_label(&self) -> String {
        self.top_genre
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }
}

/// Compute the KPI values over a filtered view.
///
/// `top_genre` is the most frequent exploded genre; among equally frequent
/// genres the one encountered first in the view wins.
pub fn compute_kpis(view: &[Movie]) -> Kpis {
    if view.is_empty() {
        return Kpis::default();
    }
    let exploded = explode_genres(view);
    let top_genre = value_counts(exploded.iter().filter_map(|m| m.genre.as_deref()))
        .into_iter()
        .next()
        .map(|(genre, _)| genre);

    Kpis {
        count: view.len(),
        median_rating: median(view.iter().filter_map(|m| m.rating)),
        median_budget: median(view.iter().filter_map(|m| m.budget)),
        top_genre,
    }
}

// ---------------------------------------------------------------------------
// Budget trend
// ---------------------------------------------------------------------------

/// Reduction applied to Budget within a (Year, Industry) group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AggMode {
    #[default]
    Mean,
    Sum,
}

impl FromStr for AggMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(AggMode::Mean),
            "sum" => Ok(AggMode::Sum),
            other => Err(ParseModeError {
                kind: "aggregation mode",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for AggMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggMode::Mean => write!(f, "Mean"),
            AggMode::Sum => write!(f, "Sum"),
        }
    }
}

/// One point of the budget trend.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub year: i32,
    pub industry: String,
    pub budget: f64,
}

/// Group by (Year, Industry) in ascending key order and reduce Budget.
///
/// Missing budgets are skipped. A group with no budget sums to zero and has
/// no mean, so it is omitted in mean mode.
pub fn aggregate_trend(view: &[Movie], mode: AggMode) -> Vec<TrendRow> {
    let mut groups: BTreeMap<(i32, &str), (f64, usize)> = BTreeMap::new();
    for m in view {
        let acc = groups.entry((m.year, m.industry.as_str())).or_default();
        if let Some(b) = m.budget {
            acc.0 += b;
            acc.1 += 1;
        }
    }

    groups
        .into_iter()
        .filter_map(|((year, industry), (sum, n))| {
            let budget = match mode {
                AggMode::Sum => sum,
                AggMode::Mean if n > 0 => sum / n as f64,
                AggMode::Mean => return None,
            };
            Some(TrendRow {
                year,
                industry: industry.to_string(),
                budget,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Genre counts
// ---------------------------------------------------------------------------

/// Ordering of the genre explorer entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// Count descending.
    #[default]
    Count,
    /// Genre name ascending.
    Alpha,
}

impl FromStr for SortMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "count" => Ok(SortMode::Count),
            "alpha" => Ok(SortMode::Alpha),
            other => Err(ParseModeError {
                kind: "sort mode",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreCount {
    pub genre: String,
    pub count: usize,
}

/// Exploded genre frequencies, sorted by `sort` and truncated to `top_n`.
pub fn top_genre_counts(view: &[Movie], top_n: usize, sort: SortMode) -> Vec<GenreCount> {
    let exploded = explode_genres(view);
    let mut counts: Vec<GenreCount> = value_counts(exploded.iter().filter_map(|m| m.genre.as_deref()))
        .into_iter()
        .map(|(genre, count)| GenreCount { genre, count })
        .collect();

    match sort {
        SortMode::Count => counts.sort_by(|a, b| b.count.cmp(&a.count)),
        SortMode::Alpha => counts.sort_by(|a, b| a.genre.cmp(&b.genre)),
    }
    counts.truncate(top_n);
    counts
}

// ---------------------------------------------------------------------------
// Rating distributions
// ---------------------------------------------------------------------------

/// Categorical axis of the rating box plot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BoxDimension {
    #[default]
    Industry,
    Genre,
}

impl fmt::Display for BoxDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoxDimension::Industry => write!(f, "Industry"),
            BoxDimension::Genre => write!(f, "Genre"),
        }
    }
}

/// Rating distribution of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBox {
    pub category: String,
    pub summary: BoxSummary,
    /// Every rating in the category, in view order.
    pub points: Vec<f64>,
}

/// Per-category rating summaries, categories in first-encountered order.
/// Genre mode explodes the view first.
pub fn rating_distribution(view: &[Movie], dim: BoxDimension) -> Vec<CategoryBox> {
    let exploded;
    let rows = match dim {
        BoxDimension::Industry => view,
        BoxDimension::Genre => {
            exploded = explode_genres(view);
            exploded.as_slice()
        }
    };

    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for m in rows {
        let Some(rating) = m.rating else { continue };
        let key = match dim {
            BoxDimension::Industry => m.industry.clone(),
            BoxDimension::Genre => m.genre.clone().unwrap_or_default(),
        };
        let i = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[i].1.push(rating);
    }

    groups
        .into_iter()
        .filter_map(|(category, points)| {
            let summary = box_summary(points.iter().copied())?;
            Some(CategoryBox {
                category,
                summary,
                points,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Budget vs runtime scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub duration: f64,
    pub budget: f64,
    pub rating: Option<f64>,
    pub name: String,
    pub year: i32,
    pub genre: Option<String>,
}

/// Scatter points sharing a language.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterGroup {
    pub language: String,
    pub points: Vec<ScatterPoint>,
}

/// Budget/duration points grouped by language in first-encountered order.
/// Rows missing either coordinate are skipped.
pub fn scatter_groups(view: &[Movie]) -> Vec<ScatterGroup> {
    let mut groups: Vec<ScatterGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for m in view {
        let (Some(duration), Some(budget)) = (m.duration, m.budget) else {
            continue;
        };
        let language = m.language_label();
        let i = *index.entry(language).or_insert_with(|| {
            groups.push(ScatterGroup {
                language: language.to_string(),
                points: Vec::new(),
            });
            groups.len() - 1
        });
        groups[i].points.push(ScatterPoint {
            duration,
            budget,
            rating: m.rating,
            name: m.name.clone(),
            year: m.year,
            genre: m.genre.clone(),
        });
    }
    groups
}

/// Largest rating among the scatter points, used to scale bubble sizes.
pub fn max_rating(groups: &[ScatterGroup]) -> Option<f64> {
    groups
        .iter()
        .flat_map(|g| g.points.iter().filter_map(|p| p.rating))
        .filter(|r| *r > 0.0)
        .max_by(f64::total_cmp)
}

/// Marker diameter so that marker area is proportional to the rating.
pub fn bubble_diameter(rating: Option<f64>, max_rating: f64, size_max: f32) -> f32 {
    match rating {
        Some(r) if r > 0.0 && max_rating > 0.0 => size_max * (r / max_rating).sqrt() as f32,
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

/// Counts per category, one series per industry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedCounts {
    /// Category labels along the x axis.
    pub categories: Vec<String>,
    /// `(industry, counts)` where `counts[i]` belongs to `categories[i]`.
    pub series: Vec<(String, Vec<usize>)>,
}

impl GroupedCounts {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

/// Exploded genre frequencies split by industry.
pub fn genre_industry_counts(view: &[Movie]) -> GroupedCounts {
    let exploded = explode_genres(view);
    let mut categories: Vec<String> = Vec::new();
    let mut cat_index: HashMap<&str, usize> = HashMap::new();
    let mut series: Vec<(String, Vec<usize>)> = Vec::new();
    let mut ser_index: HashMap<&str, usize> = HashMap::new();

    for m in &exploded {
        let Some(genre) = m.genre.as_deref() else { continue };
        let c = *cat_index.entry(genre).or_insert_with(|| {
            categories.push(genre.to_string());
            categories.len() - 1
        });
        let s = *ser_index.entry(m.industry.as_str()).or_insert_with(|| {
            series.push((m.industry.clone(), Vec::new()));
            series.len() - 1
        });
        let counts = &mut series[s].1;
        if counts.len() <= c {
            counts.resize(c + 1, 0);
        }
        counts[c] += 1;
    }

    for (_, counts) in &mut series {
        counts.resize(categories.len(), 0);
    }
    GroupedCounts { categories, series }
}

/// Movie counts per year bin, one series per industry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearHistogram {
    /// First year of each bin.
    pub bin_starts: Vec<i32>,
    /// Bin width in years.
    pub width: i32,
    pub series: Vec<(String, Vec<usize>)>,
}

/// Bin the view's years into at most `max_bins` equal integer-width bins
/// starting at the earliest year. `None` for an empty view.
pub fn year_histogram(view: &[Movie], max_bins: usize) -> Option<YearHistogram> {
    let lo = view.iter().map(|m| m.year).min()?;
    let hi = view.iter().map(|m| m.year).max()?;
    let span = (i64::from(hi) - i64::from(lo) + 1) as usize;
    let width = span.div_ceil(max_bins.max(1));
    let n_bins = span.div_ceil(width);

    let mut series: Vec<(String, Vec<usize>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for m in view {
        let s = *index.entry(m.industry.as_str()).or_insert_with(|| {
            series.push((m.industry.clone(), vec![0; n_bins]));
            series.len() - 1
        });
        let bin = (i64::from(m.year) - i64::from(lo)) as usize / width;
        series[s].1[bin] += 1;
    }

    let bin_starts = (0..n_bins as i64)
        .map(|i| (i64::from(lo) + i * width as i64) as i32)
        .collect();
    Some(YearHistogram {
        bin_starts,
        width: width as i32,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::movie;

    fn rated(mut m: Movie, rating: f64) -> Movie {
        m.rating = Some(rating);
        m
    }

    #[test]
    fn kpis_on_empty_view_are_placeholders() {
        let k = compute_kpis(&[]);
        assert_eq!(k.count_label(), "0");
        assert_eq!(k.rating_label(), PLACEHOLDER);
        assert_eq!(k.budget_label(), PLACEHOLDER);
        assert_eq!(k.top_genre_label(), PLACEHOLDER);
    }

    #[test]
    fn kpis_over_a_selection() {
        let view = vec![
            rated(movie(2000, "A", Some("Action|Drama"), Some(1_000_000.0)), 6.0),
            rated(movie(2001, "A", Some("Drama"), Some(3_000_000.0)), 8.0),
            rated(movie(2002, "B", Some("Comedy"), None), 7.5),
        ];
        let k = compute_kpis(&view);
        assert_eq!(k.count, 3);
        assert_eq!(k.rating_label(), "7.50");
        assert_eq!(k.budget_label(), "$2.0M");
        assert_eq!(k.top_genre.as_deref(), Some("Drama"));
    }

    #[test]
    fn top_genre_tie_is_one_of_the_tied_values() {
        let view = vec![
            movie(2000, "A", Some("Action"), None),
            movie(2000, "A", Some("Drama"), None),
        ];
        let top = compute_kpis(&view).top_genre.expect("has genres");
        assert!(top == "Action" || top == "Drama");
    }

    #[test]
    fn kpis_without_genres_have_no_top_genre() {
        let k = compute_kpis(&[movie(2000, "A", None, Some(5.0))]);
        assert_eq!(k.count, 1);
        assert_eq!(k.top_genre_label(), PLACEHOLDER);
        assert_eq!(k.budget_label(), "$5");
    }

    #[test]
    fn trend_sum_and_mean() {
        let view = vec![
            movie(2000, "A", None, Some(10.0)),
            movie(2000, "A", None, Some(20.0)),
        ];
        let sum = aggregate_trend(&view, "sum".parse().expect("valid mode"));
        assert_eq!(
            sum,
            vec![TrendRow {
                year: 2000,
                industry: "A".into(),
                budget: 30.0
            }]
        );
        let mean = aggregate_trend(&view, "mean".parse().expect("valid mode"));
        assert_eq!(mean[0].budget, 15.0);
        assert_eq!(mean.len(), 1);
    }

    #[test]
    fn trend_groups_are_sorted_by_year_then_industry() {
        let view = vec![
            movie(2001, "B", None, Some(1.0)),
            movie(2000, "B", None, Some(2.0)),
            movie(2000, "A", None, Some(3.0)),
        ];
        let keys: Vec<(i32, String)> = aggregate_trend(&view, AggMode::Sum)
            .into_iter()
            .map(|r| (r.year, r.industry))
            .collect();
        assert_eq!(
            keys,
            vec![(2000, "A".into()), (2000, "B".into()), (2001, "B".into())]
        );
    }

    #[test]
    fn trend_skips_missing_budgets() {
        let view = vec![
            movie(2000, "A", None, Some(10.0)),
            movie(2000, "A", None, None),
            movie(2001, "A", None, None),
        ];
        let mean = aggregate_trend(&view, AggMode::Mean);
        assert_eq!(mean.len(), 1);
        assert_eq!(mean[0].budget, 10.0);
        let sum = aggregate_trend(&view, AggMode::Sum);
        assert_eq!(sum.len(), 2);
        assert_eq!(sum[1].budget, 0.0);
    }

    #[test]
    fn unknown_modes_are_rejected() {
        let err = "median".parse::<AggMode>().unwrap_err();
        assert_eq!(err.to_string(), "unknown aggregation mode 'median'");
        assert!("size".parse::<SortMode>().is_err());
        assert_eq!("alpha".parse::<SortMode>(), Ok(SortMode::Alpha));
    }

    fn genre_view() -> Vec<Movie> {
        vec![
            movie(2000, "A", Some("Drama|Action"), None),
            movie(2001, "A", Some("Drama"), None),
            movie(2002, "B", Some("Comedy, Drama"), None),
            movie(2003, "B", Some("Action"), None),
            movie(2004, "B", Some("Animation"), None),
        ]
    }

    #[test]
    fn top_genres_by_count() {
        let counts = top_genre_counts(&genre_view(), 2, SortMode::Count);
        assert_eq!(
            counts,
            vec![
                GenreCount { genre: "Drama".into(), count: 3 },
                GenreCount { genre: "Action".into(), count: 2 },
            ]
        );
    }

    #[test]
    fn top_genres_alphabetical() {
        let names: Vec<String> = top_genre_counts(&genre_view(), 10, SortMode::Alpha)
            .into_iter()
            .map(|g| g.genre)
            .collect();
        assert_eq!(names, vec!["Action", "Animation", "Comedy", "Drama"]);
    }

    #[test]
    fn top_one_returns_exactly_the_leader() {
        let by_count = top_genre_counts(&genre_view(), 1, SortMode::Count);
        assert_eq!(by_count.len(), 1);
        assert_eq!(by_count[0].genre, "Drama");
        let by_name = top_genre_counts(&genre_view(), 1, SortMode::Alpha);
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].genre, "Action");
    }

    #[test]
    fn top_genres_of_empty_view() {
        assert!(top_genre_counts(&[], 5, SortMode::Count).is_empty());
    }

    #[test]
    fn rating_distribution_by_industry_and_genre() {
        let view = vec![
            rated(movie(2000, "A", Some("Drama|Action"), None), 6.0),
            rated(movie(2001, "B", Some("Drama"), None), 8.0),
            rated(movie(2002, "A", Some("Drama"), None), 7.0),
        ];
        let by_industry = rating_distribution(&view, BoxDimension::Industry);
        assert_eq!(by_industry.len(), 2);
        assert_eq!(by_industry[0].category, "A");
        assert_eq!(by_industry[0].points, vec![6.0, 7.0]);
        assert_eq!(by_industry[0].summary.median, 6.5);

        let by_genre = rating_distribution(&view, BoxDimension::Genre);
        let cats: Vec<&str> = by_genre.iter().map(|b| b.category.as_str()).collect();
        assert_eq!(cats, vec!["Drama", "Action"]);
        assert_eq!(by_genre[0].points, vec![6.0, 8.0, 7.0]);
    }

    #[test]
    fn rating_distribution_skips_unrated_rows() {
        let mut m = movie(2000, "A", Some("Drama"), None);
        m.rating = None;
        assert!(rating_distribution(&[m], BoxDimension::Industry).is_empty());
    }

    #[test]
    fn scatter_groups_by_language_and_skips_incomplete_rows() {
        let mut hindi = movie(2001, "Bollywood", Some("Drama"), Some(2.0));
        hindi.language = Some("Hindi".into());
        let mut no_lang = movie(2002, "A", None, Some(3.0));
        no_lang.language = None;
        let mut no_runtime = movie(2003, "A", None, Some(4.0));
        no_runtime.duration = None;
        let view = vec![
            movie(2000, "Hollywood", Some("Action"), Some(1.0)),
            hindi,
            no_lang,
            no_runtime,
            movie(2004, "Hollywood", None, None),
        ];
        let groups = scatter_groups(&view);
        let langs: Vec<&str> = groups.iter().map(|g| g.language.as_str()).collect();
        assert_eq!(langs, vec!["English", "Hindi", "Unknown"]);
        assert_eq!(groups[0].points.len(), 1);
        assert_eq!(groups[0].points[0].budget, 1.0);
    }

    #[test]
    fn bubble_area_scales_with_rating() {
        assert_eq!(bubble_diameter(Some(9.0), 9.0, 10.0), 10.0);
        assert!((bubble_diameter(Some(2.25), 9.0, 10.0) - 5.0).abs() < 1e-6);
        assert_eq!(bubble_diameter(None, 9.0, 10.0), 0.0);
    }

    #[test]
    fn max_rating_ignores_missing() {
        let mut unrated = movie(2000, "A", None, Some(1.0));
        unrated.rating = None;
        let groups = scatter_groups(&[unrated.clone(), rated(movie(2001, "A", None, Some(1.0)), 8.5)]);
        assert_eq!(max_rating(&groups), Some(8.5));
        assert_eq!(max_rating(&scatter_groups(&[unrated])), None);
    }

    #[test]
    fn genre_histogram_splits_by_industry() {
        let counts = genre_industry_counts(&genre_view());
        assert_eq!(counts.categories, vec!["Drama", "Action", "Comedy", "Animation"]);
        assert_eq!(
            counts.series,
            vec![
                ("A".to_string(), vec![2, 1, 0, 0]),
                ("B".to_string(), vec![1, 1, 1, 1]),
            ]
        );
    }

    #[test]
    fn genre_histogram_of_empty_view() {
        assert!(genre_industry_counts(&[]).is_empty());
    }

    #[test]
    fn year_histogram_bins() {
        let view: Vec<Movie> = (1980..2020).map(|y| movie(y, "A", None, None)).collect();
        let h = year_histogram(&view, 20).expect("non-empty");
        assert_eq!(h.width, 2);
        assert_eq!(h.bin_starts.len(), 20);
        assert_eq!(h.bin_starts[0], 1980);
        assert_eq!(h.series[0].1.iter().sum::<usize>(), 40);
        assert!(h.series[0].1.iter().all(|&c| c == 2));
    }

    #[test]
    fn year_histogram_short_span_uses_yearly_bins() {
        let view = vec![
            movie(2000, "A", None, None),
            movie(2002, "B", None, None),
            movie(2002, "A", None, None),
        ];
        let h = year_histogram(&view, 20).expect("non-empty");
        assert_eq!(h.width, 1);
        assert_eq!(h.bin_starts, vec![2000, 2001, 2002]);
        assert_eq!(h.series[0], ("A".to_string(), vec![1, 0, 1]));
        assert_eq!(h.series[1], ("B".to_string(), vec![0, 0, 1]));
    }

    #[test]
    fn year_histogram_spans_the_full_year_domain() {
        let view = vec![movie(i32::MIN, "A", None, None), movie(i32::MAX, "A", None, None)];
        let h = year_histogram(&view, 20).expect("non-empty");
        assert_eq!(h.bin_starts.len(), 20);
        assert_eq!(h.bin_starts[0], i32::MIN);
        assert!(h.bin_starts.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(h.series[0].1.iter().sum::<usize>(), 2);
    }

    #[test]
    fn year_histogram_of_empty_view() {
        assert!(year_histogram(&[], 20).is_none());
    }
}
