use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const CSV_PATH: &str = "Datasets/final_movies_dataset.csv";
const PARQUET_PATH: &str = "Datasets/final_movies_dataset.parquet";
const ROWS: usize = 600;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One output row, using the dataset's column names.
#[derive(Debug, Serialize)]
struct Row {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Year")]
    year: i64,
    #[serde(rename = "Industry")]
    industry: String,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Rating")]
    rating: Option<f64>,
    #[serde(rename = "Budget")]
    budget: Option<f64>,
    #[serde(rename = "Duration")]
    duration: f64,
    #[serde(rename = "Language")]
    language: String,
}

/// (industry, language, median budget)
const INDUSTRIES: [(&str, &str, f64); 4] = [
    ("Hollywood", "English", 6.0e7),
    ("Bollywood", "Hindi", 8.0e6),
    ("Tollywood", "Telugu", 5.0e6),
    ("Kollywood", "Tamil", 4.0e6),
];

const GENRES: [&str; 10] = [
    "Action", "Drama", "Comedy", "Thriller", "Romance", "Horror", "Sci-Fi", "Crime", "Animation",
    "Family",
];

const DELIMITERS: [&str; 4] = ["|", "/", ";", ", "];

fn generate(rng: &mut SimpleRng) -> Vec<Row> {
    (0..ROWS)
        .map(|i| {
            let (industry, language, base_budget) =
                INDUSTRIES[(rng.next_u64() % INDUSTRIES.len() as u64) as usize];
            let year = 1970 + (rng.next_f64().powf(0.6) * 55.0) as i64;

            // 1-3 genres joined by a random delimiter; a few rows are missing
            let genre = if rng.next_f64() < 0.03 {
                None
            } else {
                let n = 1 + (rng.next_u64() % 3) as usize;
                let picked: Vec<&str> = (0..n).map(|_| rng.pick(&GENRES)).collect();
                Some(picked.join(rng.pick(&DELIMITERS)))
            };

            let growth = 1.04f64.powi((year - 1970) as i32);
            let budget = (rng.next_f64() > 0.05)
                .then(|| (base_budget * growth * rng.gauss(0.0, 0.6).exp() / 10.0).round() * 10.0);
            let rating = (rng.next_f64() > 0.02).then(|| rng.gauss(6.6, 1.1).clamp(1.0, 9.8));

            Row {
                name: format!("Movie {:04}", i + 1),
                year,
                industry: industry.to_string(),
                genre,
                rating: rating.map(|r| (r * 10.0).round() / 10.0),
                budget,
                duration: rng.gauss(130.0, 25.0).clamp(70.0, 220.0).round(),
                language: language.to_string(),
            }
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let text = |name: &str, nullable: bool| Field::new(name, DataType::Utf8, nullable);
    let schema = Arc::new(Schema::new(vec![
        text("Name", false),
        Field::new("Year", DataType::Int64, false),
        text("Industry", false),
        text("Genre", true),
        Field::new("Rating", DataType::Float64, true),
        Field::new("Budget", DataType::Float64, true),
        Field::new("Duration", DataType::Float64, false),
        text("Language", false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.name))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.year))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.industry))),
            Arc::new(rows.iter().map(|r| r.genre.as_deref()).collect::<StringArray>()),
            Arc::new(rows.iter().map(|r| r.rating).collect::<Float64Array>()),
            Arc::new(rows.iter().map(|r| r.budget).collect::<Float64Array>()),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.duration))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| &r.language))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    std::fs::create_dir_all("Datasets").context("creating Datasets directory")?;
    write_csv(&rows, Path::new(CSV_PATH))?;
    write_parquet(&rows, Path::new(PARQUET_PATH))?;

    println!(
        "Wrote {} movies to {CSV_PATH} and {PARQUET_PATH}",
        rows.len()
    );
    Ok(())
}
