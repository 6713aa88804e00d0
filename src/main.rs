mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::MovieInsightApp;
use clap::Parser;
use data::aggregate::{AggMode, SortMode};
use eframe::egui;
use state::AppState;

/// Dataset looked up when `--data` is not given.
const DEFAULT_DATASET: &str = "Datasets/final_movies_dataset.csv";

/// Interactive dashboard for exploring a movie dataset.
#[derive(Parser, Debug)]
#[command(name = "movie-insight", version, about)]
struct Cli {
    /// Dataset to load on start-up (.csv, .json or .parquet).
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Initial budget trend reduction: `mean` or `sum`.
    #[arg(long, value_name = "MODE")]
    agg: Option<AggMode>,

    /// Initial genre explorer ordering: `count` or `alpha`.
    #[arg(long, value_name = "ORDER")]
    genre_sort: Option<SortMode>,
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut state = AppState::default();
    if let Some(agg) = cli.agg {
        state.controls.agg = agg;
    }
    if let Some(sort) = cli.genre_sort {
        state.controls.genre_sort = sort;
    }
    match cli.data {
        Some(path) => state.load_path(&path),
        None => {
            let path = PathBuf::from(DEFAULT_DATASET);
            if path.exists() {
                state.load_path(&path);
            } else {
                log::info!("No dataset at {DEFAULT_DATASET}; use File → Open…");
            }
        }
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Movie Insight Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(MovieInsightApp::new(state)))),
    )
}
