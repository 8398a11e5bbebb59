//! Inductor catalog.
//!
//! A catalog is a CSV table with the columns `size`, `inductance`, `dcr`,
//! `saturation_current` (the historical misspelling `staturation_current`
//! is accepted) and `type`. It is loaded once and never mutated.
//!
//! Rows are external, untrusted input: a row that does not deserialize or
//! whose inductance does not parse is skipped with a warning instead of
//! failing the whole load.

pub mod priority;
pub mod quantity;

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::RedcError;

pub use priority::{CategoryPriorityTable, CONSTRUCTION_ORDER, VENDOR_ORDER};
pub use quantity::{parse_inductance_uh, parse_quantity, Quantity, SiPrefix};

const EMBEDDED_INDUCTORS: &str = include_str!("../../catalog/inductors.csv");

/// Relative tolerance under which two inductances count as the same value.
pub const INDUCTANCE_TOLERANCE: f64 = 1e-9;

pub fn same_inductance(a: f64, b: f64) -> bool {
    (a - b).abs() <= INDUCTANCE_TOLERANCE * a.abs().max(b.abs())
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(default)]
    size: String,
    inductance: String,
    #[serde(default)]
    dcr: String,
    #[serde(default, alias = "staturation_current")]
    saturation_current: String,
    #[serde(default, rename = "type", alias = "category")]
    category: String,
}

/// One catalog part. Text fields are kept as written in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InductorRecord {
    pub size: String,
    pub inductance: String,
    pub dcr: String,
    pub saturation_current: String,
    pub category: String,
    /// `inductance` normalised to microhenries.
    pub inductance_uh: f64,
}

impl InductorRecord {
    pub fn new(
        size: impl Into<String>,
        inductance: impl Into<String>,
        dcr: impl Into<String>,
        saturation_current: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<Self, RedcError> {
        let inductance = inductance.into();
        let inductance_uh = parse_inductance_uh(&inductance)?;
        Ok(Self {
            size: size.into(),
            inductance,
            dcr: dcr.into(),
            saturation_current: saturation_current.into(),
            category: category.into(),
            inductance_uh,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<InductorRecord>,
    skipped: usize,
}

impl Catalog {
    pub fn from_records(records: Vec<InductorRecord>) -> Self {
        Self {
            records,
            skipped: 0,
        }
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Result<Self, RedcError> {
        Self::from_csv_str(EMBEDDED_INDUCTORS)
    }

    pub fn from_path(path: &Path) -> Result<Self, RedcError> {
        tracing::debug!("Reading inductor catalog {:?}", path);
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_csv_str(csv: &str) -> Result<Self, RedcError> {
        Self::from_reader(csv.as_bytes())
    }

    /// Read a catalog, skipping malformed rows. Only I/O failures are errors.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, RedcError> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        let mut skipped = 0;

        for (index, row) in reader.deserialize::<CatalogRow>().enumerate() {
            // Header is line 1.
            let line = index + 2;
            let row = match row {
                Ok(row) => row,
                Err(e) if e.is_io_error() => return Err(e.into()),
                Err(e) => {
                    tracing::warn!("Skipping catalog line {}: {}", line, e);
                    skipped += 1;
                    continue;
                }
            };

            match InductorRecord::new(
                row.size,
                row.inductance,
                row.dcr,
                row.saturation_current,
                row.category,
            ) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping catalog line {}: {}", line, e);
                    skipped += 1;
                }
            }
        }

        tracing::info!(
            "Loaded {} inductors ({} rows skipped)",
            records.len(),
            skipped
        );
        Ok(Self { records, skipped })
    }

    pub fn records(&self) -> &[InductorRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows dropped while loading.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Distinct inductances in µH, in order of first appearance.
    pub fn distinct_standard_inductances(&self) -> Vec<f64> {
        let mut values: Vec<f64> = Vec::new();
        for record in &self.records {
            if !values.iter().any(|v| same_inductance(*v, record.inductance_uh)) {
                values.push(record.inductance_uh);
            }
        }
        values
    }

    /// Parts whose inductance equals `inductance_uh` within tolerance, in catalog order.
    pub fn parts_with_inductance(
        &self,
        inductance_uh: f64,
    ) -> impl Iterator<Item = &InductorRecord> + '_ {
        self.records
            .iter()
            .filter(move |record| same_inductance(record.inductance_uh, inductance_uh))
    }
}
