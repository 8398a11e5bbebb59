//! redc - standard component value resolution for DC-DC converters
//!
//! Computes the ideal feedback divider resistors or boost inductance for a
//! converter and resolves them to real, purchasable values: E-series
//! resistors and parts from an inductor catalog.
//!
//! # Quick Start
//!
//! ```no_run
//! use redc::{DividerOptions, RedcCore};
//! use rust_decimal_macros::dec;
//!
//! let options = DividerOptions::new(dec!(5.0), dec!(0.8));
//! let report = RedcCore::solve_divider(&options).unwrap();
//!
//! for combination in &report.combinations {
//!     println!(
//!         "R1 {} R2 {} ({}%)",
//!         combination.resistor_top,
//!         combination.resistor_bottom,
//!         combination.relative_error_percent
//!     );
//! }
//! ```
//!
//! # Features
//!
//! - **E-series**: E6, E12, E24, E48 and E96 values with exact decimal arithmetic
//! - **Divider ranking**: every top resistor matched to its best bottom resistor
//! - **Inductor selection**: nearest catalog inductance, parts ordered by construction

pub mod catalog;
pub mod core;
pub mod equations;
pub mod matcher;
pub mod ranker;
pub mod series;

// Re-export main types
pub use catalog::{Catalog, CategoryPriorityTable, InductorRecord};
pub use core::{
    DividerOptions, DividerReport, ErrorKind, InductorOptions, InductorReport, RedcCore,
    RedcError, SweepSide,
};
pub use matcher::{nearest, relative_error, CandidateMatch};
pub use ranker::{DividerCombination, ErrorBand};
pub use series::ESeries;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Catalog, CategoryPriorityTable, DividerCombination, DividerOptions, DividerReport,
        ESeries, InductorOptions, InductorRecord, InductorReport, RedcCore, RedcError,
        SweepSide,
    };
}
