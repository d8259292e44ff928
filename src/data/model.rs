use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Parse errors for categorical cells and widget values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown species '{0}'")]
    UnknownSpecies(String),
    #[error("unknown sex '{0}'")]
    UnknownSex(String),
    #[error("unknown attribute '{0}'")]
    UnknownAttribute(String),
}

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// The three species recorded at Palmer Station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Adelie,
    Chinstrap,
    Gentoo,
}

impl Species {
    /// Widget order, which is also the order species first appear in the dataset.
    pub const ALL: [Species; 3] = [Species::Adelie, Species::Gentoo, Species::Chinstrap];

    pub fn as_str(self) -> &'static str {
        match self {
            Species::Adelie => "Adelie",
            Species::Chinstrap => "Chinstrap",
            Species::Gentoo => "Gentoo",
        }
    }
}

impl FromStr for Species {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The raw LTER export uses long names such as "Adelie Penguin (Pygoscelis adeliae)".
        let first_word = s.trim().split_whitespace().next().unwrap_or("");
        Species::ALL
            .into_iter()
            .find(|sp| sp.as_str().eq_ignore_ascii_case(first_word))
            .ok_or_else(|| ParseError::UnknownSpecies(s.to_string()))
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Sex
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Female => "female",
            Sex::Male => "male",
        }
    }
}

impl FromStr for Sex {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "female" | "f" => Ok(Sex::Female),
            "male" | "m" => Ok(Sex::Male),
            _ => Err(ParseError::UnknownSex(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Attribute – the numeric measurements a chart can be built from
// ---------------------------------------------------------------------------

/// Numeric measurement columns selectable in the histogram dropdown and
/// usable as scatter axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    BillLengthMm,
    BillDepthMm,
    FlipperLengthMm,
    BodyMassG,
}

impl Attribute {
    pub const ALL: [Attribute; 4] = [
        Attribute::BillLengthMm,
        Attribute::BillDepthMm,
        Attribute::FlipperLengthMm,
        Attribute::BodyMassG,
    ];

    /// Column name in the source dataset.
    pub fn column(self) -> &'static str {
        match self {
            Attribute::BillLengthMm => "bill_length_mm",
            Attribute::BillDepthMm => "bill_depth_mm",
            Attribute::FlipperLengthMm => "flipper_length_mm",
            Attribute::BodyMassG => "body_mass_g",
        }
    }

    /// Human readable axis label.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::BillLengthMm => "Bill Length (mm)",
            Attribute::BillDepthMm => "Bill Depth (mm)",
            Attribute::FlipperLengthMm => "Flipper Length (mm)",
            Attribute::BodyMassG => "Body Mass (g)",
        }
    }

    pub fn value(self, penguin: &Penguin) -> Option<f64> {
        match self {
            Attribute::BillLengthMm => penguin.bill_length_mm,
            Attribute::BillDepthMm => penguin.bill_depth_mm,
            Attribute::FlipperLengthMm => penguin.flipper_length_mm,
            Attribute::BodyMassG => penguin.body_mass_g,
        }
    }
}

impl FromStr for Attribute {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.column() == s.trim())
            .ok_or_else(|| ParseError::UnknownAttribute(s.to_string()))
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

// ---------------------------------------------------------------------------
// Penguin – one row of the dataset
// ---------------------------------------------------------------------------

/// A single observation. Measurements are `None` where the source has `NA`.
#[derive(Debug, Clone, PartialEq)]
pub struct Penguin {
    pub species: Species,
    pub island: String,
    pub bill_length_mm: Option<f64>,
    pub bill_depth_mm: Option<f64>,
    pub flipper_length_mm: Option<f64>,
    pub body_mass_g: Option<f64>,
    pub sex: Option<Sex>,
    pub year: Option<i32>,
}

// ---------------------------------------------------------------------------
// Column – every displayable field, used by the table and grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Species,
    Island,
    Measurement(Attribute),
    Sex,
    Year,
}

impl Column {
    /// Source column order.
    pub const ALL: [Column; 8] = [
        Column::Species,
        Column::Island,
        Column::Measurement(Attribute::BillLengthMm),
        Column::Measurement(Attribute::BillDepthMm),
        Column::Measurement(Attribute::FlipperLengthMm),
        Column::Measurement(Attribute::BodyMassG),
        Column::Sex,
        Column::Year,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Column::Species => "species",
            Column::Island => "island",
            Column::Measurement(attr) => attr.column(),
            Column::Sex => "sex",
            Column::Year => "year",
        }
    }

    /// Display text of this column for one record; missing values read `NA`.
    pub fn cell(self, penguin: &Penguin) -> String {
        const MISSING: &str = "NA";
        match self {
            Column::Species => penguin.species.to_string(),
            Column::Island => penguin.island.clone(),
            Column::Measurement(attr) => attr
                .value(penguin)
                .map(|v| format!("{v}"))
                .unwrap_or_else(|| MISSING.to_string()),
            Column::Sex => penguin
                .sex
                .map(|s| s.as_str().to_string())
                .unwrap_or_else(|| MISSING.to_string()),
            Column::Year => penguin
                .year
                .map(|y| y.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
        }
    }

    /// Order two records by this column. Missing values compare as `None`;
    /// callers decide where they go.
    pub fn compare(self, a: &Penguin, b: &Penguin) -> Option<Ordering> {
        match self {
            Column::Species => Some(a.species.as_str().cmp(b.species.as_str())),
            Column::Island => Some(a.island.cmp(&b.island)),
            Column::Measurement(attr) => match (attr.value(a), attr.value(b)) {
                (Some(x), Some(y)) => Some(x.total_cmp(&y)),
                _ => None,
            },
            Column::Sex => match (a.sex, b.sex) {
                (Some(x), Some(y)) => Some(x.cmp(&y)),
                _ => None,
            },
            Column::Year => match (a.year, b.year) {
                (Some(x), Some(y)) => Some(x.cmp(&y)),
                _ => None,
            },
        }
    }

    pub fn is_missing(self, penguin: &Penguin) -> bool {
        match self {
            Column::Species | Column::Island => false,
            Column::Measurement(attr) => attr.value(penguin).is_none(),
            Column::Sex => penguin.sex.is_none(),
            Column::Year => penguin.year.is_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// PenguinDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded dataset. Never mutated after construction; shared behind `Arc`.
#[derive(Debug, Clone, Default)]
pub struct PenguinDataset {
    records: Vec<Penguin>,
}

impl PenguinDataset {
    pub fn new(records: Vec<Penguin>) -> Self {
        PenguinDataset { records }
    }

    pub fn records(&self) -> &[Penguin] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record count per species, in [`Species::ALL`] order.
    pub fn species_counts(&self) -> Vec<(Species, usize)> {
        Species::ALL
            .into_iter()
            .map(|sp| (sp, self.records.iter().filter(|p| p.species == sp).count()))
            .collect()
    }
}
