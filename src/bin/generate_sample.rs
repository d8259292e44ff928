use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic Palmer Penguins dataset for trying out the dashboard.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Output file; a `.parquet` or `.pq` extension selects Parquet, anything else CSV
    #[arg(default_value = "penguins.csv")]
    output: PathBuf,

    /// Seed for the generator; the same seed always writes the same rows
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Per-species population: (mean, std dev) of bill length, bill depth,
/// flipper length and body mass.
struct Population {
    species: &'static str,
    count: usize,
    islands: &'static [&'static str],
    measurements: [(f64, f64); 4],
}

const POPULATIONS: [Population; 3] = [
    Population {
        species: "Adelie",
        count: 152,
        islands: &["Torgersen", "Biscoe", "Dream"],
        measurements: [(38.8, 2.7), (18.3, 1.2), (190.0, 6.5), (3700.0, 459.0)],
    },
    Population {
        species: "Gentoo",
        count: 124,
        islands: &["Biscoe"],
        measurements: [(47.5, 3.1), (15.0, 1.0), (217.2, 6.5), (5076.0, 504.0)],
    },
    Population {
        species: "Chinstrap",
        count: 68,
        islands: &["Dream"],
        measurements: [(48.8, 3.3), (18.4, 1.1), (195.8, 7.1), (3733.0, 384.0)],
    },
];

const YEARS: [i64; 3] = [2007, 2008, 2009];

#[derive(Default)]
struct Columns {
    species: Vec<String>,
    island: Vec<String>,
    measurements: [Vec<Option<f64>>; 4],
    sex: Vec<Option<String>>,
    year: Vec<i64>,
}

fn generate(rng: &mut SimpleRng) -> Columns {
    let mut cols = Columns::default();
    let mut row: usize = 0;

    for pop in &POPULATIONS {
        for i in 0..pop.count {
            let sex = rng.pick(&["female", "male"]);
            // Males are a little larger.
            let scale = if sex == "male" { 1.04 } else { 0.96 };

            // A couple of records lack every measurement, a few more lack sex.
            let unmeasured = row % 170 == 3;
            for (slot, &(mean, sd)) in cols.measurements.iter_mut().zip(&pop.measurements) {
                let value = rng.gauss(mean * scale, sd * 0.8);
                slot.push((!unmeasured).then(|| (value * 10.0).round() / 10.0));
            }

            cols.species.push(pop.species.to_string());
            cols.island.push(rng.pick(pop.islands).to_string());
            cols.sex
                .push((!unmeasured && row % 31 != 7).then(|| sex.to_string()));
            cols.year.push(YEARS[i * YEARS.len() / pop.count]);
            row += 1;
        }
    }

    cols
}

fn write_csv(path: &Path, cols: &Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record([
        "species",
        "island",
        "bill_length_mm",
        "bill_depth_mm",
        "flipper_length_mm",
        "body_mass_g",
        "sex",
        "year",
    ])?;

    let na = |v: Option<f64>| v.map(|x| x.to_string()).unwrap_or_else(|| "NA".to_string());
    for i in 0..cols.species.len() {
        writer.write_record([
            cols.species[i].clone(),
            cols.island[i].clone(),
            na(cols.measurements[0][i]),
            na(cols.measurements[1][i]),
            na(cols.measurements[2][i]),
            na(cols.measurements[3][i]),
            cols.sex[i].clone().unwrap_or_else(|| "NA".to_string()),
            cols.year[i].to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, cols: &Columns) -> Result<()> {
    let mut fields = vec![
        Field::new("species", DataType::Utf8, false),
        Field::new("island", DataType::Utf8, false),
    ];
    for name in ["bill_length_mm", "bill_depth_mm", "flipper_length_mm", "body_mass_g"] {
        fields.push(Field::new(name, DataType::Float64, true));
    }
    fields.push(Field::new("sex", DataType::Utf8, true));
    fields.push(Field::new("year", DataType::Int64, false));
    let schema = Arc::new(Schema::new(fields));

    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(cols.species.clone())),
        Arc::new(StringArray::from(cols.island.clone())),
    ];
    for values in &cols.measurements {
        arrays.push(Arc::new(Float64Array::from(values.clone())));
    }
    arrays.push(Arc::new(StringArray::from(cols.sex.clone())));
    arrays.push(Arc::new(Int64Array::from(cols.year.clone())));

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let path = args.output.as_path();

    let mut rng = SimpleRng::new(args.seed);
    let cols = generate(&mut rng);

    let is_parquet = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(path, &cols)?;
    } else {
        write_csv(path, &cols)?;
    }

    println!("Wrote {} penguins to {}", cols.species.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn args_are_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn output_and_seed_default() {
        let args = Args::try_parse_from(["generate_sample"]).unwrap();
        assert_eq!(args.output, PathBuf::from("penguins.csv"));
        assert_eq!(args.seed, 42);

        let args = Args::try_parse_from(["generate_sample", "out.parquet", "--seed", "7"]).unwrap();
        assert_eq!(args.output, PathBuf::from("out.parquet"));
        assert_eq!(args.seed, 7);
    }

    #[test]
    fn same_seed_same_rows() {
        let a = generate(&mut SimpleRng::new(7));
        let b = generate(&mut SimpleRng::new(7));
        assert_eq!(a.species.len(), 344);
        assert_eq!(a.measurements, b.measurements);
        assert!(a.measurements[0].iter().any(Option::is_none));
    }
}
