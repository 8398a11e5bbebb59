//! Ranking of divider combinations and inductor parts.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::{Catalog, CategoryPriorityTable, InductorRecord};
use crate::core::RedcError;
use crate::equations::{divider_output, ideal_bottom_resistor, ideal_top_resistor};
use crate::matcher::{match_value, match_value_f64, nearest_by, CandidateMatch};

/// One row of the divider report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DividerCombination {
    pub resistor_top: Decimal,
    pub resistor_bottom: Decimal,
    pub relative_error_percent: Decimal,
}

impl DividerCombination {
    /// Output voltage this pair really produces for the given reference.
    pub fn achieved_vout(&self, vref: Decimal) -> Result<Decimal, RedcError> {
        divider_output(vref, self.resistor_top, self.resistor_bottom)
    }
}

/// Combinations sharing one relative error, in rank order.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBand<'a> {
    pub relative_error_percent: Decimal,
    pub combinations: Vec<&'a DividerCombination>,
}

/// For each top resistor, match the ideal bottom resistor against `bottoms`.
///
/// Results are in `tops` order. Any equation or matching failure aborts the
/// whole sweep.
pub fn sweep_dividers(
    vout: Decimal,
    vref: Decimal,
    tops: &[Decimal],
    bottoms: &[Decimal],
) -> Result<Vec<DividerCombination>, RedcError> {
    tops.iter()
        .map(|&top| -> Result<DividerCombination, RedcError> {
            let ideal = ideal_bottom_resistor(vout, vref, top)?;
            let CandidateMatch {
                matched_value,
                relative_error_percent,
                ..
            } = match_value(ideal, bottoms)?;
            Ok(DividerCombination {
                resistor_top: top,
                resistor_bottom: matched_value,
                relative_error_percent,
            })
        })
        .collect()
}

/// For each bottom resistor, match the ideal top resistor against `tops`.
pub fn sweep_dividers_for_bottom(
    vout: Decimal,
    vref: Decimal,
    bottoms: &[Decimal],
    tops: &[Decimal],
) -> Result<Vec<DividerCombination>, RedcError> {
    bottoms
        .iter()
        .map(|&bottom| -> Result<DividerCombination, RedcError> {
            let ideal = ideal_top_resistor(vout, vref, bottom)?;
            let matched = match_value(ideal, tops)?;
            Ok(DividerCombination {
                resistor_top: matched.matched_value,
                resistor_bottom: bottom,
                relative_error_percent: matched.relative_error_percent,
            })
        })
        .collect()
}

/// Stable ascending sort by relative error.
pub fn sort_by_error(combinations: &mut [DividerCombination]) {
    combinations.sort_by(|a, b| a.relative_error_percent.cmp(&b.relative_error_percent));
}

/// [`sweep_dividers`] followed by [`sort_by_error`].
pub fn rank_dividers(
    vout: Decimal,
    vref: Decimal,
    tops: &[Decimal],
    bottoms: &[Decimal],
) -> Result<Vec<DividerCombination>, RedcError> {
    let mut combinations = sweep_dividers(vout, vref, tops, bottoms)?;
    sort_by_error(&mut combinations);
    Ok(combinations)
}

/// [`sweep_dividers_for_bottom`] followed by [`sort_by_error`].
pub fn rank_dividers_for_bottom(
    vout: Decimal,
    vref: Decimal,
    bottoms: &[Decimal],
    tops: &[Decimal],
) -> Result<Vec<DividerCombination>, RedcError> {
    let mut combinations = sweep_dividers_for_bottom(vout, vref, bottoms, tops)?;
    sort_by_error(&mut combinations);
    Ok(combinations)
}

/// The combination whose top resistor is closest to `target`.
///
/// Independent of error ranking; ties go to the first in slice order.
pub fn best_target(
    combinations: &[DividerCombination],
    target: Decimal,
) -> Option<&DividerCombination> {
    nearest_by(combinations.iter(), |c| (c.resistor_top - target).abs())
}

/// Group consecutive combinations with equal error.
///
/// Expects input already sorted by [`sort_by_error`].
pub fn group_by_error(ranked: &[DividerCombination]) -> Vec<ErrorBand<'_>> {
    let mut bands: Vec<ErrorBand<'_>> = Vec::new();
    for combination in ranked {
        let error = combination.relative_error_percent;
        if let Some(band) = bands
            .last_mut()
            .filter(|band| band.relative_error_percent == error)
        {
            band.combinations.push(combination);
            continue;
        }
        bands.push(ErrorBand {
            relative_error_percent: error,
            combinations: vec![combination],
        });
    }
    bands
}

/// Standard inductance chosen for an ideal value and the parts that carry it.
#[derive(Debug, Clone, Serialize)]
pub struct InductorSelection {
    pub standard: CandidateMatch<f64>,
    /// Ordered by category priority; unknown categories last, catalog order kept.
    pub parts: Vec<InductorRecord>,
}

pub fn select_inductors(
    catalog: &Catalog,
    priorities: &CategoryPriorityTable,
    ideal_uh: f64,
) -> Result<InductorSelection, RedcError> {
    let standards = catalog.distinct_standard_inductances();
    if standards.is_empty() {
        return Err(RedcError::EmptyCandidateSet(
            "inductor catalog has no parseable parts".to_string(),
        ));
    }

    let standard = match_value_f64(ideal_uh, &standards)?;
    let mut parts: Vec<InductorRecord> = catalog
        .parts_with_inductance(standard.matched_value)
        .cloned()
        .collect();
    priorities.sort_records(&mut parts);

    Ok(InductorSelection { standard, parts })
}
