//! Core resolution API shared by the CLI and library users.
//! No printing, no formatting: only decimal values and percentages.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::{Catalog, CategoryPriorityTable};
use crate::equations::{ideal_inductance_uh, ripple_current};
use crate::matcher::CandidateMatch;
use crate::ranker::{
    best_target, group_by_error, select_inductors, sort_by_error, sweep_dividers,
    sweep_dividers_for_bottom, DividerCombination, ErrorBand,
};
use crate::series::{ESeries, ALL_DECADES, TOP_DECADES};

#[derive(Debug, thiserror::Error)]
pub enum RedcError {
    #[error("Unknown E-series: {0} (expected one of E6, E12, E24, E48, E96)")]
    UnknownSeries(String),
    #[error("Degenerate circuit: {0}")]
    DegenerateCircuit(String),
    #[error("No candidates to match against: {0}")]
    EmptyCandidateSet(String),
    #[error("Division by zero: {0}")]
    DivisionByZero(String),
    #[error("Cannot parse quantity: {0:?}")]
    UnparsableQuantity(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification of [`RedcError`] used to pick a process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller asked for something impossible (bad series, vref = 0, ...).
    Input,
    /// The data being searched is unusable (empty catalog, unparsable values).
    Data,
    Io,
}

impl RedcError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RedcError::UnknownSeries(_)
            | RedcError::DegenerateCircuit(_)
            | RedcError::InvalidInput(_) => ErrorKind::Input,
            RedcError::EmptyCandidateSet(_)
            | RedcError::DivisionByZero(_)
            | RedcError::UnparsableQuantity(_)
            | RedcError::Json(_) => ErrorKind::Data,
            RedcError::Io(_) | RedcError::Csv(_) => ErrorKind::Io,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Input => 1,
            ErrorKind::Data => 2,
            ErrorKind::Io => 3,
        }
    }
}

/// Which resistor of the divider is swept over standard values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub enum SweepSide {
    /// Sweep the top resistor (R1), match the bottom one (R2).
    #[default]
    Top,
    /// Sweep the bottom resistor (R2), match the top one (R1).
    Bottom,
}

/// Options for a feedback divider run.
#[derive(Clone, Debug)]
pub struct DividerOptions {
    pub vout: Decimal,
    pub vref: Decimal,
    pub series: ESeries,
    pub save_path: Option<PathBuf>,
    /// Preferred top resistor; selects the combination whose R1 is closest.
    pub target_top: Option<Decimal>,
    pub sweep: SweepSide,
}

impl DividerOptions {
    pub fn new(vout: Decimal, vref: Decimal) -> Self {
        Self {
            vout,
            vref,
            series: ESeries::default(),
            save_path: None,
            target_top: None,
            sweep: SweepSide::default(),
        }
    }

    /// Reject inputs the divider equations cannot handle meaningfully.
    ///
    /// `vout == vref` is left to the equation solver, which reports it as
    /// a degenerate circuit.
    pub fn validate(&self) -> Result<(), RedcError> {
        if self.vref.is_zero() {
            return Err(RedcError::InvalidInput("Vref cannot be 0".to_string()));
        }
        if self.vout.is_zero() {
            return Err(RedcError::InvalidInput("Vout cannot be 0".to_string()));
        }
        if self.vref.is_sign_negative() || self.vout.is_sign_negative() {
            return Err(RedcError::InvalidInput(
                "Vout and Vref must be positive".to_string(),
            ));
        }
        if self.vout < self.vref {
            return Err(RedcError::InvalidInput(format!(
                "Vout ({}) must not be below Vref ({})",
                self.vout, self.vref
            )));
        }
        if let Some(target) = self.target_top {
            if target <= Decimal::ZERO {
                return Err(RedcError::InvalidInput(
                    "target top resistor must be positive".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Options for sizing a boost converter inductor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InductorOptions {
    pub vin: f64,
    pub vout: f64,
    pub iout: f64,
    pub fsw_hz: f64,
    /// Peak-to-peak ripple as a fraction of the average inductor current.
    pub ripple_ratio: f64,
}

impl Default for InductorOptions {
    fn default() -> Self {
        Self {
            vin: 5.0,
            vout: 12.0,
            iout: 1.0,
            fsw_hz: 500_000.0,
            ripple_ratio: 0.3,
        }
    }
}

impl InductorOptions {
    pub fn validate(&self) -> Result<(), RedcError> {
        let fields = [
            ("vin", self.vin),
            ("vout", self.vout),
            ("iout", self.iout),
            ("fsw", self.fsw_hz),
            ("ripple ratio", self.ripple_ratio),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(RedcError::InvalidInput(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if self.ripple_ratio > 1.0 {
            return Err(RedcError::InvalidInput(format!(
                "ripple ratio must be in (0, 1], got {}",
                self.ripple_ratio
            )));
        }
        Ok(())
    }
}

/// Ranked divider combinations for one run.
#[derive(Debug, Clone, Serialize)]
pub struct DividerReport {
    pub series: ESeries,
    pub vout: Decimal,
    pub vref: Decimal,
    /// Sorted ascending by relative error; ties keep sweep order.
    pub combinations: Vec<DividerCombination>,
    /// Combination whose R1 is closest to the requested target, if any.
    pub best_target: Option<DividerCombination>,
}

impl DividerReport {
    /// The combination with the smallest relative error.
    pub fn best(&self) -> Option<&DividerCombination> {
        self.combinations.first()
    }

    pub fn bands(&self) -> Vec<ErrorBand<'_>> {
        group_by_error(&self.combinations)
    }
}

/// Inductor sizing result with the ordered matching catalog parts.
#[derive(Debug, Clone, Serialize)]
pub struct InductorReport {
    pub options: InductorOptions,
    pub ripple_current_a: f64,
    pub standard: CandidateMatch<f64>,
    pub parts: Vec<crate::catalog::InductorRecord>,
}

/// Core resolution API used by the CLI.
pub struct RedcCore;

impl RedcCore {
    /// Sweep standard resistors and rank the resulting divider combinations.
    pub fn solve_divider(options: &DividerOptions) -> Result<DividerReport, RedcError> {
        options.validate()?;

        let swept = options.series.values(TOP_DECADES);
        let matched = options.series.values(ALL_DECADES);

        let sweep = match options.sweep {
            SweepSide::Top => sweep_dividers(options.vout, options.vref, &swept, &matched)?,
            SweepSide::Bottom => {
                sweep_dividers_for_bottom(options.vout, options.vref, &swept, &matched)?
            }
        };

        let best_target = options
            .target_top
            .and_then(|target| best_target(&sweep, target))
            .cloned();

        let mut combinations = sweep;
        sort_by_error(&mut combinations);

        tracing::debug!(
            series = %options.series,
            combinations = combinations.len(),
            best_error = ?combinations.first().map(|c| c.relative_error_percent),
            "ranked divider combinations"
        );

        Ok(DividerReport {
            series: options.series,
            vout: options.vout,
            vref: options.vref,
            combinations,
            best_target,
        })
    }

    /// Size the inductor and pick matching parts from the catalog.
    pub fn select_inductor(
        catalog: &Catalog,
        priorities: &CategoryPriorityTable,
        options: &InductorOptions,
    ) -> Result<InductorReport, RedcError> {
        options.validate()?;

        let ripple = ripple_current(options.iout, options.vout, options.vin, options.ripple_ratio)?;
        let ideal = ideal_inductance_uh(options.vin, options.vout, ripple, options.fsw_hz)?;
        if ideal <= 0.0 {
            return Err(RedcError::InvalidInput(format!(
                "Vout ({}) must exceed Vin ({}) for a boost inductor",
                options.vout, options.vin
            )));
        }

        let selection = select_inductors(catalog, priorities, ideal)?;

        tracing::debug!(
            ideal_uh = ideal,
            standard_uh = selection.standard.matched_value,
            parts = selection.parts.len(),
            "selected inductors"
        );

        Ok(InductorReport {
            options: options.clone(),
            ripple_current_a: ripple,
            standard: selection.standard,
            parts: selection.parts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exit_codes_by_kind() {
        assert_eq!(RedcError::InvalidInput("x".into()).exit_code(), 1);
        assert_eq!(RedcError::UnknownSeries("E7".into()).exit_code(), 1);
        assert_eq!(RedcError::DegenerateCircuit("x".into()).exit_code(), 1);
        assert_eq!(RedcError::EmptyCandidateSet("x".into()).exit_code(), 2);
        assert_eq!(RedcError::DivisionByZero("x".into()).kind(), ErrorKind::Data);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(RedcError::from(io).exit_code(), 3);
    }

    #[test]
    fn test_divider_options_validation() {
        assert!(DividerOptions::new(dec!(5), dec!(0.8)).validate().is_ok());
        assert!(matches!(
            DividerOptions::new(dec!(5), dec!(0)).validate(),
            Err(RedcError::InvalidInput(_))
        ));
        assert!(matches!(
            DividerOptions::new(dec!(0), dec!(0.8)).validate(),
            Err(RedcError::InvalidInput(_))
        ));
        assert!(DividerOptions::new(dec!(0.5), dec!(0.8)).validate().is_err());

        let mut options = DividerOptions::new(dec!(5), dec!(0.8));
        options.target_top = Some(dec!(-1));
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_equal_vout_vref_is_degenerate() {
        let options = DividerOptions::new(dec!(0.8), dec!(0.8));
        let err = RedcCore::solve_divider(&options).unwrap_err();
        assert!(matches!(err, RedcError::DegenerateCircuit(_)));
    }

    #[test]
    fn test_inductor_options_validation() {
        assert!(InductorOptions::default().validate().is_ok());

        let options = InductorOptions {
            ripple_ratio: 1.5,
            ..InductorOptions::default()
        };
        assert!(options.validate().is_err());

        let options = InductorOptions {
            fsw_hz: 0.0,
            ..InductorOptions::default()
        };
        assert!(matches!(options.validate(), Err(RedcError::InvalidInput(_))));
    }

    #[test]
    fn test_report_best_is_lowest_error() {
        let report = RedcCore::solve_divider(&DividerOptions::new(dec!(5), dec!(0.8))).unwrap();
        let best = report.best().unwrap();
        assert!(report
            .combinations
            .iter()
            .all(|c| c.relative_error_percent >= best.relative_error_percent));
        assert!(report.best_target.is_none());
    }
}
