//! Writes sample datasets into the repository directory so there is
//! something to open on first start.

use std::fs::File;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{BooleanArray, Date32Array, Float64Array, Int64Array, RecordBatch, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::util::pretty::pretty_format_batches;
use parquet::arrow::ArrowWriter;

use rusty_sql::{AppConfig, Repository};

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
}

/// Days from 1970-01-01 to 2024-01-01.
const JAN_1_2024: i32 = 19_723;

fn sales_batch(rows: usize, rng: &mut SimpleRng) -> Result<RecordBatch> {
    let regions = ["North", "South", "East", "West"];
    let products = ["Widget", "Gadget", "Gizmo", "Doohickey"];

    let mut order_id = Vec::with_capacity(rows);
    let mut order_date = Vec::with_capacity(rows);
    let mut region = Vec::with_capacity(rows);
    let mut product = Vec::with_capacity(rows);
    let mut quantity = Vec::with_capacity(rows);
    let mut unit_price = Vec::with_capacity(rows);
    let mut shipped = Vec::with_capacity(rows);

    for i in 0..rows {
        order_id.push(1000 + i as i64);
        order_date.push(JAN_1_2024 + (rng.next_u64() % 365) as i32);
        region.push(rng.pick(&regions));
        product.push(rng.pick(&products));
        quantity.push(1 + (rng.next_u64() % 20) as i64);
        unit_price.push((rng.next_f64() * 9500.0).round() / 100.0 + 5.0);
        shipped.push(rng.next_f64() > 0.2);
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new("order_id", DataType::Int64, false),
        Field::new("order_date", DataType::Date32, false),
        Field::new("region", DataType::Utf8, false),
        Field::new("product", DataType::Utf8, false),
        Field::new("quantity", DataType::Int64, false),
        Field::new("unit_price", DataType::Float64, false),
        Field::new("shipped", DataType::Boolean, false),
    ]));

    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(order_id)),
            Arc::new(Date32Array::from(order_date)),
            Arc::new(StringArray::from(region)),
            Arc::new(StringArray::from(product)),
            Arc::new(Int64Array::from(quantity)),
            Arc::new(Float64Array::from(unit_price)),
            Arc::new(BooleanArray::from(shipped)),
        ],
    )
    .context("building sample record batch")
}

fn main() -> Result<()> {
    env_logger::init();

    let config = AppConfig::load().context("loading configuration")?;
    let repo = Repository::open(&config.data_dir)
        .with_context(|| format!("creating {}", config.data_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let batch = sales_batch(250, &mut rng)?;

    // Parquet
    let parquet_path = repo.dir().join("sample_sales.parquet");
    let file = File::create(&parquet_path)
        .with_context(|| format!("creating {}", parquet_path.display()))?;
    let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
    writer.write(&batch)?;
    writer.close()?;

    // CSV
    let csv_path = repo.dir().join("sample_sales.csv");
    let file =
        File::create(&csv_path).with_context(|| format!("creating {}", csv_path.display()))?;
    let mut writer = arrow::csv::WriterBuilder::new().with_header(true).build(file);
    writer.write(&batch)?;

    // JSON (array of records)
    let json_path = repo.dir().join("sample_sales.json");
    let file =
        File::create(&json_path).with_context(|| format!("creating {}", json_path.display()))?;
    let mut writer = arrow::json::ArrayWriter::new(file);
    writer.write(&batch)?;
    writer.finish()?;

    println!("{}", pretty_format_batches(&[batch.slice(0, 5)])?);
    println!(
        "Wrote {} rows to {}, {} and {}",
        batch.num_rows(),
        parquet_path.display(),
        csv_path.display(),
        json_path.display()
    );
    Ok(())
}
