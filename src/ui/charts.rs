use std::ops::RangeInclusive;

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, MarkerShape, Plot,
    PlotPoint, Points,
};

use crate::color::{discrete_color, viridis};
use crate::data::aggregate::{
    AggMode, BoxDimension, ScatterPoint, SortMode, bubble_diameter, max_rating,
};
use crate::data::format::{PLACEHOLDER, format_currency};
use crate::state::{AppState, GenreStyle};
use crate::ui::treemap::genre_treemap;

const CHART_HEIGHT: f32 = 450.0;
const HISTOGRAM_HEIGHT: f32 = 400.0;

/// Centered placeholder shown instead of an empty chart.
fn empty_chart(ui: &mut Ui, message: &str, height: f32) {
    ui.allocate_ui(eframe::egui::vec2(ui.available_width(), height), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(RichText::new(message).weak());
        });
    });
}

/// Axis tick label for a categorical axis laid out at integer positions.
fn category_label(labels: &[String], value: f64) -> String {
    let rounded = value.round();
    if (value - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// Tick label on a log10 axis.
fn log_tick(value: f64, currency: bool) -> String {
    let raw = 10f64.powf(value);
    if currency {
        format_currency(&raw)
    } else {
        format!("{raw:.0}")
    }
}

// ---------------------------------------------------------------------------
// Budget vs Year
// ---------------------------------------------------------------------------

pub fn trend_tab(ui: &mut Ui, state: &mut AppState) {
    let c = &mut state.controls;
    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut c.agg, AggMode::Mean, "Average Budget");
        ui.radio_value(&mut c.agg, AggMode::Sum, "Total Budget");
        ui.separator();
        ui.checkbox(&mut c.trend_markers, "Show markers");
    });

    if state.charts.trend.is_empty() {
        empty_chart(ui, "No data for selection.", CHART_HEIGHT);
        return;
    }
    ui.strong(format!("{} Budget by Year (per Industry)", state.controls.agg));

    // one line per industry, in first-seen order
    let mut lines: Vec<(&str, Vec<[f64; 2]>)> = Vec::new();
    for row in &state.charts.trend {
        let point = [row.year as f64, row.budget];
        match lines.iter_mut().find(|(ind, _)| *ind == row.industry) {
            Some((_, pts)) => pts.push(point),
            None => lines.push((row.industry.as_str(), vec![point])),
        }
    }

    let markers = state.controls.trend_markers;
    Plot::new("trend_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Budget")
        .y_axis_formatter(|mark: GridMark, _range: &RangeInclusive<f64>| {
            format_currency(&mark.value)
        })
        .show(ui, |plot_ui| {
            for (industry, pts) in lines {
                let color = state.industry_colors.color_for(industry);
                if markers {
                    plot_ui.points(
                        Points::new(pts.clone())
                            .name(industry)
                            .color(color)
                            .radius(3.0)
                            .filled(true),
                    );
                }
                plot_ui.line(Line::new(pts).name(industry).color(color).width(2.0));
            }
        });
}

// ---------------------------------------------------------------------------
// Budget vs Runtime
// ---------------------------------------------------------------------------

pub fn scatter_tab(ui: &mut Ui, state: &mut AppState) {
    let c = &mut state.controls;
    ui.horizontal(|ui: &mut Ui| {
        ui.checkbox(&mut c.log_x, "Log X (Runtime)");
        ui.checkbox(&mut c.log_y, "Log Y (Budget)");
        ui.separator();
        ui.add(
            eframe::egui::Slider::new(&mut c.bubble_size, 5.0..=20.0)
                .step_by(1.0)
                .text("max bubble"),
        );
    });

    let groups = &state.charts.scatter;
    if groups.is_empty() {
        empty_chart(ui, "No data for selection.", CHART_HEIGHT);
        return;
    }
    ui.strong("Budget vs Runtime (Bubble size = Rating)");

    let log_x = state.controls.log_x;
    let log_y = state.controls.log_y;
    let size_max = state.controls.bubble_size;
    let max_r = max_rating(groups).unwrap_or(1.0);
    let axis = |v: f64, log: bool| -> Option<f64> {
        match log {
            true if v > 0.0 => Some(v.log10()),
            true => None,
            false => Some(v),
        }
    };

    // Points series share one radius, so bucket by whole-point radius.
    let mut series: Vec<(String, Color32, f32, Vec<[f64; 2]>)> = Vec::new();
    let mut hover: Vec<([f64; 2], String)> = Vec::new();
    for (gi, group) in groups.iter().enumerate() {
        let color = discrete_color(gi);
        for p in &group.points {
            let (Some(x), Some(y)) = (axis(p.duration, log_x), axis(p.budget, log_y)) else {
                continue;
            };
            let radius = (bubble_diameter(p.rating, max_r, size_max) / 2.0).round().max(1.0);
            match series
                .iter_mut()
                .find(|(lang, _, r, _)| *lang == group.language && *r == radius)
            {
                Some((_, _, _, pts)) => pts.push([x, y]),
                None => series.push((group.language.clone(), color, radius, vec![[x, y]])),
            }
            hover.push(([x, y], hover_text(p)));
        }
    }

    Plot::new("scatter_plot")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Duration (min)")
        .y_axis_label("Budget")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            if log_x {
                log_tick(mark.value, false)
            } else {
                format!("{:.0}", mark.value)
            }
        })
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            if log_y {
                log_tick(mark.value, true)
            } else {
                format_currency(&mark.value)
            }
        })
        .label_formatter(move |_name: &str, value: &PlotPoint| nearest_label(&hover, value))
        .show(ui, |plot_ui| {
            for (language, color, radius, pts) in series {
                plot_ui.points(
                    Points::new(pts)
                        .name(language)
                        .color(color.gamma_multiply(0.8))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(radius),
                );
            }
        });
}

/// Hover card for one scatter point.
fn hover_text(p: &ScatterPoint) -> String {
    format!(
        "{} ({})\n{}\nRuntime: {:.0} min\nBudget: {}\nRating: {}",
        p.name,
        p.year,
        p.genre.as_deref().unwrap_or(PLACEHOLDER),
        p.duration,
        format_currency(&p.budget),
        p.rating.map(|r| format!("{r:.1}")).unwrap_or_else(|| PLACEHOLDER.into()),
    )
}

/// Hover text of the point closest to the cursor.
fn nearest_label(points: &[([f64; 2], String)], at: &PlotPoint) -> String {
    points
        .iter()
        .min_by(|(a, _), (b, _)| {
            let da = (a[0] - at.x).powi(2) + (a[1] - at.y).powi(2);
            let db = (b[0] - at.x).powi(2) + (b[1] - at.y).powi(2);
            da.total_cmp(&db)
        })
        .map(|(_, label)| label.clone())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Rating distributions
// ---------------------------------------------------------------------------

pub fn box_tab(ui: &mut Ui, state: &mut AppState) {
    let c = &mut state.controls;
    ui.horizontal(|ui: &mut Ui| {
        ui.radio_value(&mut c.box_dim, BoxDimension::Industry, "By Industry");
        ui.radio_value(&mut c.box_dim, BoxDimension::Genre, "By Genre");
        ui.separator();
        ui.checkbox(&mut c.box_points, "Show all points");
    });

    let boxes = &state.charts.boxes;
    if boxes.is_empty() {
        empty_chart(ui, "No data for selection.", CHART_HEIGHT);
        return;
    }
    let dim = state.controls.box_dim;
    ui.strong(format!("Distribution of Ratings by {dim}"));

    let labels: Vec<String> = boxes.iter().map(|b| b.category.clone()).collect();
    let show_points = state.controls.box_points;
    Plot::new("box_plot")
        .height(CHART_HEIGHT)
        .x_axis_label(dim.to_string())
        .y_axis_label("Rating")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        })
        .show(ui, |plot_ui| {
            for (i, b) in boxes.iter().enumerate() {
                let color = match dim {
                    BoxDimension::Industry => state.industry_colors.color_for(&b.category),
                    BoxDimension::Genre => discrete_color(i),
                };
                let s = &b.summary;
                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
                )
                .name(&b.category)
                .box_width(0.5)
                .whisker_width(0.3)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&b.category).color(color));

                if show_points {
                    let pts: Vec<[f64; 2]> = b
                        .points
                        .iter()
                        .enumerate()
                        .map(|(j, &r)| [i as f64 - 0.45 + jitter(j), r])
                        .collect();
                    plot_ui.points(Points::new(pts).color(color).radius(2.0).filled(true));
                }
            }
        });
}

/// Deterministic horizontal offset in `[0, 0.15)` spreading overlapping points.
fn jitter(j: usize) -> f64 {
    (j as f64 * 0.618_033_988_75).fract() * 0.15
}

// ---------------------------------------------------------------------------
// Genre explorer
// ---------------------------------------------------------------------------

pub fn genre_tab(ui: &mut Ui, state: &mut AppState) {
    let c = &mut state.controls;
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Top N Genres");
        ui.add(eframe::egui::Slider::new(&mut c.top_n, 5..=20));
        ui.separator();
        ui.label("Sort by");
        ui.radio_value(&mut c.genre_sort, SortMode::Count, "Count (desc)");
        ui.radio_value(&mut c.genre_sort, SortMode::Alpha, "Alphabetical");
        ui.separator();
        ui.label("Display Style");
        ui.radio_value(&mut c.genre_style, GenreStyle::Bar, "Bar Chart");
        ui.radio_value(&mut c.genre_style, GenreStyle::Treemap, "Treemap");
    });

    let genres = &state.charts.genres;
    if genres.is_empty() {
        empty_chart(ui, "No genre data.", CHART_HEIGHT);
        return;
    }

    if state.controls.genre_style == GenreStyle::Treemap {
        ui.strong("Top Genres (Treemap)");
        genre_treemap(ui, genres, CHART_HEIGHT);
        return;
    }

    ui.strong("Top Genres");
    let lo = genres.iter().map(|g| g.count).min().unwrap_or(0) as f32;
    let hi = genres.iter().map(|g| g.count).max().unwrap_or(0) as f32;
    let bars: Vec<Bar> = genres
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let t = if hi > lo { (g.count as f32 - lo) / (hi - lo) } else { 1.0 };
            Bar::new(i as f64, g.count as f64)
                .name(&g.genre)
                .width(0.8)
                .fill(viridis(t))
        })
        .collect();
    let labels: Vec<String> = genres.iter().map(|g| g.genre.clone()).collect();

    Plot::new("genre_plot")
        .height(CHART_HEIGHT)
        .x_axis_label("Genre")
        .y_axis_label("Count")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Count"));
        });
}

// ---------------------------------------------------------------------------
// Histograms
// ---------------------------------------------------------------------------

pub fn histograms_tab(ui: &mut Ui, state: &AppState) {
    ui.heading("Genre Distribution");
    let hist = &state.charts.genre_hist;
    if hist.is_empty() {
        empty_chart(ui, "No genre data.", HISTOGRAM_HEIGHT);
    } else {
        let n = hist.series.len().max(1) as f64;
        let slot = 0.95 / n;
        let charts: Vec<BarChart> = hist
            .series
            .iter()
            .enumerate()
            .map(|(s, (industry, counts))| {
                let color = state.industry_colors.color_for(industry);
                let offset = -0.475 + slot * (s as f64 + 0.5);
                let bars = counts
                    .iter()
                    .enumerate()
                    .map(|(c, &count)| Bar::new(c as f64 + offset, count as f64).width(slot))
                    .collect();
                BarChart::new(bars).name(industry).color(color)
            })
            .collect();
        let labels = hist.categories.clone();

        Plot::new("genre_hist")
            .height(HISTOGRAM_HEIGHT)
            .legend(Legend::default())
            .x_axis_label("Genre")
            .y_axis_label("Movie Count")
            .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                category_label(&labels, mark.value)
            })
            .show(ui, |plot_ui| {
                for chart in charts {
                    plot_ui.bar_chart(chart);
                }
            });
    }

    ui.separator();
    ui.heading("Yearwise Movie Distribution");
    let Some(years) = &state.charts.year_hist else {
        empty_chart(ui, "No year data.", HISTOGRAM_HEIGHT);
        return;
    };

    let width = years.width as f64;
    let mut stacked: Vec<BarChart> = Vec::new();
    for (industry, counts) in &years.series {
        let bars = years
            .bin_starts
            .iter()
            .zip(counts)
            .map(|(&start, &count)| {
                let label = if years.width == 1 {
                    start.to_string()
                } else {
                    format!("{start}–{}", start.saturating_add(years.width - 1))
                };
                Bar::new(start as f64 + width / 2.0, count as f64)
                    .width(width * 0.8)
                    .name(label)
            })
            .collect();
        let below: Vec<&BarChart> = stacked.iter().collect();
        let chart = BarChart::new(bars)
            .name(industry)
            .color(state.industry_colors.color_for(industry))
            .stack_on(&below);
        stacked.push(chart);
    }

    Plot::new("year_hist")
        .height(HISTOGRAM_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Movie Count")
        .show(ui, |plot_ui| {
            for chart in stacked {
                plot_ui.bar_chart(chart);
            }
        });
}
