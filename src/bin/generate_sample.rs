use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Date32Array, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Days, NaiveDate};
use parquet::arrow::ArrowWriter;

const PARQUET_PATH: &str = "sample_transactions.parquet";
const CSV_PATH: &str = "sample_transactions.csv";
const ROWS: usize = 2_000;

/// Segment name and typical transaction size.
const SEGMENTS: [(&str, f64); 5] = [
    ("Enterprise", 4_800.0),
    ("SMB", 1_200.0),
    ("Consumer", 180.0),
    ("Government", 3_100.0),
    ("Startup", 650.0),
];

const INDUSTRIES: [&str; 7] = [
    "Technology",
    "Retail",
    "Healthcare",
    "Manufacturing",
    "Finance",
    "Education",
    "Hospitality",
];

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

struct Row {
    date: NaiveDate,
    amount: f64,
    segment: &'static str,
    industry: &'static str,
}

fn generate(rng: &mut SimpleRng) -> Result<Vec<Row>> {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).context("invalid start date")?;
    let span_days = 3 * 365;

    (0..ROWS)
        .map(|_| {
            let date = start
                .checked_add_days(Days::new(rng.below(span_days) as u64))
                .context("date out of range")?;
            let (segment, typical) = SEGMENTS[rng.below(SEGMENTS.len())];
            let industry = INDUSTRIES[rng.below(INDUSTRIES.len())];
            // Refunds show up as the occasional negative amount.
            let sign = if rng.next_f64() < 0.03 { -1.0 } else { 1.0 };
            let amount = (rng.gauss(typical, typical * 0.35).abs() * sign * 100.0).round() / 100.0;
            Ok(Row {
                date,
                amount,
                segment,
                industry,
            })
        })
        .collect()
}

fn write_parquet(rows: &[Row]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("invalid epoch")?;

    let dates = Date32Array::from(
        rows.iter()
            .map(|r| (r.date - epoch).num_days() as i32)
            .collect::<Vec<_>>(),
    );
    let amounts = Float64Array::from(rows.iter().map(|r| r.amount).collect::<Vec<_>>());
    let segments = StringArray::from(rows.iter().map(|r| r.segment).collect::<Vec<_>>());
    let industries = StringArray::from(rows.iter().map(|r| r.industry).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("Date", DataType::Date32, false),
        Field::new("Amount", DataType::Float64, false),
        Field::new("customer_segment", DataType::Utf8, false),
        Field::new("businessindustrytype", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(dates),
            Arc::new(amounts),
            Arc::new(segments),
            Arc::new(industries),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV file")?;
    writer.write_record(["Date", "Amount", "customer_segment", "businessindustrytype"])?;
    for r in rows {
        writer.write_record([
            r.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", r.amount),
            r.segment.to_string(),
            r.industry.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng)?;

    write_parquet(&rows)?;
    write_csv(&rows)?;

    println!("Wrote {} transactions to {PARQUET_PATH} and {CSV_PATH}", rows.len());
    Ok(())
}
