use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{Attribute, Penguin, PenguinDataset, Sex, Species};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the penguin dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – the palmerpenguins CSV (`NA` or empty cells are missing)
/// * `.json`    – `[{ "species": "Adelie", "bill_length_mm": 39.1, ... }, ...]`
/// * `.parquet` – flat columns named as in the CSV, nulls are missing
pub fn load_file(path: &Path) -> Result<PenguinDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            read_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            parse_json(&text)
        }
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// Cell helpers shared by CSV and JSON
// ---------------------------------------------------------------------------

/// Spellings R and pandas use for a missing cell, matched case-insensitively.
const MISSING: [&str; 4] = ["NA", "NaN", "null", "None"];

/// `None` for an empty or missing-marker cell.
fn present(cell: &str) -> Option<&str> {
    let cell = cell.trim();
    let missing = cell.is_empty() || MISSING.iter().any(|m| m.eq_ignore_ascii_case(cell));
    (!missing).then_some(cell)
}

/// Measurements must be finite; `inf` would stretch every histogram.
fn finite(value: f64, row: usize, col: &str) -> Result<f64> {
    if !value.is_finite() {
        bail!("Row {row}, {col}: {value} is not a finite number");
    }
    Ok(value)
}

fn parse_measurement(cell: &str, row: usize, col: &str) -> Result<Option<f64>> {
    present(cell)
        .map(|s| {
            let value = s
                .parse::<f64>()
                .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))?;
            finite(value, row, col)
        })
        .transpose()
}

/// Years are whole numbers that fit an `i32`.
fn whole_year(value: f64, row: usize) -> Result<i32> {
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        bail!("Row {row}, year: {value} is not a whole year");
    }
    Ok(value as i32)
}

fn parse_year(cell: &str, row: usize) -> Result<Option<i32>> {
    present(cell)
        .map(|s| {
            s.parse::<i32>()
                .with_context(|| format!("Row {row}, year: '{s}' is not an integer"))
        })
        .transpose()
}

fn parse_species(cell: &str, row: usize) -> Result<Species> {
    cell.parse::<Species>()
        .with_context(|| format!("Row {row}: invalid species"))
}

fn parse_sex(cell: &str, row: usize) -> Result<Option<Sex>> {
    present(cell)
        .map(|s| s.parse::<Sex>().with_context(|| format!("Row {row}: invalid sex")))
        .transpose()
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header positions of the columns we read. Extra columns (such as the
/// `rowid` column R writes) are ignored.
struct CsvColumns {
    species: usize,
    island: Option<usize>,
    measurements: [(Attribute, usize); 4],
    sex: Option<usize>,
    year: Option<usize>,
}

impl CsvColumns {
    fn locate(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| find(name).with_context(|| format!("CSV missing '{name}' column"));

        let mut measurements = [(Attribute::BillLengthMm, 0); 4];
        for (slot, attr) in measurements.iter_mut().zip(Attribute::ALL) {
            *slot = (attr, require(attr.column())?);
        }

        Ok(CsvColumns {
            species: require("species")?,
            island: find("island"),
            measurements,
            sex: find("sex"),
            year: find("year"),
        })
    }
}

/// Parse CSV text from any reader (file or in-memory buffer).
pub fn read_csv<R: Read>(source: R) -> Result<PenguinDataset> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let cols = CsvColumns::locate(&headers)?;

    let mut records = Vec::new();

    // Rows are numbered from 1, the first record after the header.
    for (row_no, result) in (1..).zip(reader.records()) {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |idx: Option<usize>| idx.and_then(|i| record.get(i)).unwrap_or("");

        let mut penguin = Penguin {
            species: parse_species(cell(Some(cols.species)), row_no)?,
            island: cell(cols.island).trim().to_string(),
            bill_length_mm: None,
            bill_depth_mm: None,
            flipper_length_mm: None,
            body_mass_g: None,
            sex: parse_sex(cell(cols.sex), row_no)?,
            year: parse_year(cell(cols.year), row_no)?,
        };
        for (attr, idx) in cols.measurements {
            let value = parse_measurement(cell(Some(idx)), row_no, attr.column())?;
            set_measurement(&mut penguin, attr, value);
        }

        records.push(penguin);
    }

    Ok(PenguinDataset::new(records))
}

fn set_measurement(penguin: &mut Penguin, attr: Attribute, value: Option<f64>) {
    let slot = match attr {
        Attribute::BillLengthMm => &mut penguin.bill_length_mm,
        Attribute::BillDepthMm => &mut penguin.bill_depth_mm,
        Attribute::FlipperLengthMm => &mut penguin.flipper_length_mm,
        Attribute::BodyMassG => &mut penguin.body_mass_g,
    };
    *slot = value;
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "species": "Adelie", "island": "Torgersen", "bill_length_mm": 39.1,
///     "bill_depth_mm": 18.7, "flipper_length_mm": 181, "body_mass_g": 3750,
///     "sex": "male", "year": 2007 },
///   ...
/// ]
/// ```
pub fn parse_json(text: &str) -> Result<PenguinDataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in (1..).zip(rows) {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let species = json_text(obj, "species")
            .with_context(|| format!("Row {i}: missing 'species'"))?;

        let mut penguin = Penguin {
            species: parse_species(&species, i)?,
            island: json_text(obj, "island").unwrap_or_default(),
            bill_length_mm: None,
            bill_depth_mm: None,
            flipper_length_mm: None,
            body_mass_g: None,
            sex: parse_sex(&json_text(obj, "sex").unwrap_or_default(), i)?,
            year: json_f64(obj, "year", i)?
                .map(|y| whole_year(y, i))
                .transpose()?,
        };
        for attr in Attribute::ALL {
            set_measurement(&mut penguin, attr, json_f64(obj, attr.column(), i)?);
        }

        records.push(penguin);
    }

    Ok(PenguinDataset::new(records))
}

fn json_text(obj: &Map<String, JsonValue>, key: &str) -> Option<String> {
    match obj.get(key)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Null => None,
        other => Some(other.to_string()),
    }
}

fn json_f64(obj: &Map<String, JsonValue>, key: &str, row: usize) -> Result<Option<f64>> {
    match obj.get(key) {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => n.as_f64().map(|v| finite(v, row, key)).transpose(),
        Some(JsonValue::String(s)) => parse_measurement(s, row, key),
        Some(other) => bail!("Row {row}, {key}: expected a number, got {other}"),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file written by pandas (`df.to_parquet()`) or polars.
///
/// Columns are cast through Arrow, so categorical (dictionary) species and
/// integer-typed measurements are accepted as well.
fn load_parquet(path: &Path) -> Result<PenguinDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();
        records.extend(batch_to_penguins(&batch, offset)?);
    }

    Ok(PenguinDataset::new(records))
}

fn batch_to_penguins(batch: &RecordBatch, offset: usize) -> Result<Vec<Penguin>> {
    let species = string_column(batch, "species")?
        .context("Parquet file missing 'species' column")?;
    let island = string_column(batch, "island")?;
    let sex = string_column(batch, "sex")?;
    let year = typed_column::<Int64Array>(batch, "year", &DataType::Int64)?;

    let mut measurements = Vec::with_capacity(Attribute::ALL.len());
    for attr in Attribute::ALL {
        let col = typed_column::<Float64Array>(batch, attr.column(), &DataType::Float64)?
            .with_context(|| format!("Parquet file missing '{}' column", attr.column()))?;
        measurements.push((attr, col));
    }

    let mut penguins = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let row_no = offset + row + 1;
        if species.is_null(row) {
            bail!("Row {row_no}: null species");
        }

        let mut penguin = Penguin {
            species: parse_species(species.value(row), row_no)?,
            island: island
                .as_ref()
                .filter(|col| !col.is_null(row))
                .map(|col| col.value(row).to_string())
                .unwrap_or_default(),
            bill_length_mm: None,
            bill_depth_mm: None,
            flipper_length_mm: None,
            body_mass_g: None,
            sex: match sex.as_ref().filter(|col| !col.is_null(row)) {
                Some(col) => parse_sex(col.value(row), row_no)?,
                None => None,
            },
            year: match year.as_ref().filter(|col| !col.is_null(row)) {
                Some(col) => Some(
                    i32::try_from(col.value(row))
                        .with_context(|| format!("Row {row_no}, year: {} is out of range", col.value(row)))?,
                ),
                None => None,
            },
        };
        for (attr, col) in &measurements {
            // pandas writes a missing float as NaN.
            let value = match (!col.is_null(row)).then(|| col.value(row)) {
                Some(v) if !v.is_nan() => Some(finite(v, row_no, attr.column())?),
                _ => None,
            };
            set_measurement(&mut penguin, *attr, value);
        }

        penguins.push(penguin);
    }

    Ok(penguins)
}

// -- Parquet / Arrow helpers --

fn string_column(batch: &RecordBatch, name: &str) -> Result<Option<StringArray>> {
    typed_column::<StringArray>(batch, name, &DataType::Utf8)
}

/// Cast the named column to `target` and downcast it to its concrete array.
/// `Ok(None)` when the column does not exist.
fn typed_column<A: Array + Clone + 'static>(
    batch: &RecordBatch,
    name: &str,
    target: &DataType,
) -> Result<Option<A>> {
    let Some(col) = batch.column_by_name(name) else {
        return Ok(None);
    };
    let casted: Arc<dyn Array> = cast(col.as_ref(), target)
        .with_context(|| format!("column '{name}' cannot be read as {target:?}"))?;
    let array = casted
        .as_any()
        .downcast_ref::<A>()
        .with_context(|| format!("column '{name}': unexpected array type"))?
        .clone();
    Ok(Some(array))
}
