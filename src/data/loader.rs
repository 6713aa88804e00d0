use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::{Map as JsonMap, Value as JsonValue};
use thiserror::Error;

use super::model::{Movie, MovieDataset, REQUIRED_COLUMNS, RawMovie, TEXT_COLUMNS};

/// Recognised reasons a dataset cannot be used.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("dataset is missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("dataset contains no usable rows")]
    NoRows,
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a movie dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the required column names
/// * `.json`    – `[{ "Name": ..., "Year": ..., ... }, ...]`
/// * `.parquet` – flat table with the required columns
pub fn load_file(path: &Path) -> Result<MovieDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).context("opening CSV file")?;
            read_csv(file)?
        }
        "json" => {
            let file = std::fs::File::open(path).context("opening JSON file")?;
            read_json(file)?
        }
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string()).into()),
    };

    let dataset = build_dataset(rows)?;
    log::info!(
        "Loaded {} movies from {} ({} industries)",
        dataset.len(),
        path.display(),
        dataset.industries.len()
    );
    Ok(dataset)
}

/// Validate raw rows, dropping those no filter could ever select.
pub fn build_dataset(rows: Vec<RawMovie>) -> Result<MovieDataset> {
    let total = rows.len();
    let movies: Vec<Movie> = rows.into_iter().filter_map(RawMovie::into_movie).collect();
    let skipped = total - movies.len();
    if skipped > 0 {
        log::warn!("Skipped {skipped} of {total} rows without a usable Year or Industry");
    }
    if movies.is_empty() {
        return Err(LoadError::NoRows.into());
    }
    Ok(MovieDataset::from_movies(movies))
}

fn check_columns(mut present: impl FnMut(&str) -> bool) -> Result<(), LoadError> {
    match REQUIRED_COLUMNS.iter().find(|col| !present(**col)) {
        Some(missing) => Err(LoadError::MissingColumn(*missing)),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one movie per record.
/// Extra columns are ignored.
pub fn read_csv<R: Read>(input: R) -> Result<Vec<RawMovie>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    check_columns(|col| headers.iter().any(|h| h == col))?;

    reader
        .deserialize::<RawMovie>()
        .enumerate()
        .map(|(row_no, rec)| rec.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Name": "Heat", "Year": 1995, "Industry": "Hollywood", "Genre": "Crime|Drama",
///     "Rating": 8.3, "Budget": 60000000, "Duration": 170, "Language": "English" },
///   ...
/// ]
/// ```
pub fn read_json<R: Read>(input: R) -> Result<Vec<RawMovie>> {
    let root: JsonValue = serde_json::from_reader(input).context("parsing JSON")?;
    let records = root.as_array().context("Expected top-level JSON array")?;

    if let Some(first) = records.first().and_then(JsonValue::as_object) {
        check_columns(|col| first.contains_key(col))?;
    }

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let Some(obj) = rec.as_object() else {
                bail!("Row {i} is not a JSON object");
            };
            RawMovie::deserialize(stringify_text_cells(obj))
                .with_context(|| format!("JSON row {i}"))
        })
        .collect()
}

/// Render bare numbers in text columns as strings, matching the Parquet path.
fn stringify_text_cells(obj: &JsonMap<String, JsonValue>) -> JsonValue {
    let mut obj = obj.clone();
    for col in TEXT_COLUMNS {
        if let Some(JsonValue::Number(n)) = obj.get(col) {
            let text = n.to_string();
            obj.insert(col.to_string(), JsonValue::String(text));
        }
    }
    JsonValue::Object(obj)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the movie table.
///
/// Text columns may be Utf8 or LargeUtf8; numeric columns may be any of
/// Int32, Int64, Float32 or Float64. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
pub fn read_parquet(path: &Path) -> Result<Vec<RawMovie>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        check_columns(|col| schema.index_of(col).is_ok())?;

        let name = column(&batch, "Name")?;
        let year = column(&batch, "Year")?;
        let industry = column(&batch, "Industry")?;
        let genre = column(&batch, "Genre")?;
        let rating = column(&batch, "Rating")?;
        let budget = column(&batch, "Budget")?;
        let duration = column(&batch, "Duration")?;
        let language = column(&batch, "Language")?;

        for row in 0..batch.num_rows() {
            rows.push(RawMovie {
                name: extract_string(name, row),
                year: extract_f64(year, row),
                industry: extract_string(industry, row),
                genre: extract_string(genre, row),
                rating: extract_f64(rating, row),
                budget: extract_f64(budget, row),
                duration: extract_f64(duration, row),
                language: extract_string(language, row),
            });
        }
    }

    Ok(rows)
}

// -- Arrow helpers --

fn column<'b>(batch: &'b RecordBatch, name: &str) -> Result<&'b ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

/// Read a text cell; non-text columns are rendered through their numeric value.
fn extract_string(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => Some(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => extract_f64(col, row).map(|v| v.to_string()),
    }
}

/// Read a numeric cell; text cells are parsed, anything else is missing.
fn extract_f64(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int32 => Some(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Some(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => Some(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Some(col.as_primitive::<Float64Type>().value(row)),
        DataType::Utf8 => col.as_string::<i32>().value(row).trim().parse().ok(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).trim().parse().ok(),
        _ => None,
    }
}
