//! Nearest standard value search and relative error.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::core::RedcError;

/// An ideal value, the standard value chosen for it and how far off it is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateMatch<T = Decimal> {
    pub ideal_value: T,
    pub matched_value: T,
    /// `|ideal - matched| / ideal * 100`, rounded to 2 decimal places.
    pub relative_error_percent: T,
}

/// Linear scan for the candidate with the smallest distance.
///
/// Only a strictly smaller distance replaces the current best, so on a tie
/// the first candidate in iteration order wins.
pub fn nearest_by<I, T, K, F>(candidates: I, mut distance: F) -> Option<T>
where
    I: IntoIterator<Item = T>,
    K: PartialOrd,
    F: FnMut(&T) -> K,
{
    let mut iter = candidates.into_iter();
    let first = iter.next()?;
    let first_distance = distance(&first);
    let (best, _) = iter.fold((first, first_distance), |(best, best_distance), candidate| {
        let d = distance(&candidate);
        if d < best_distance {
            (candidate, d)
        } else {
            (best, best_distance)
        }
    });
    Some(best)
}

/// Closest candidate to `ideal` by absolute difference.
pub fn nearest(ideal: Decimal, candidates: &[Decimal]) -> Result<Decimal, RedcError> {
    nearest_by(candidates.iter().copied(), |c| (ideal - *c).abs()).ok_or_else(|| {
        RedcError::EmptyCandidateSet(format!("no standard value available for {}", ideal))
    })
}

/// Floating point variant of [`nearest`], used for inductances.
pub fn nearest_f64(ideal: f64, candidates: &[f64]) -> Result<f64, RedcError> {
    nearest_by(candidates.iter().copied(), |c| (ideal - *c).abs()).ok_or_else(|| {
        RedcError::EmptyCandidateSet(format!("no standard value available for {}", ideal))
    })
}

/// Deviation of `matched` from `ideal` as a percentage of `ideal`.
///
/// Rounded half away from zero to 2 decimal places. Never negative.
pub fn relative_error(ideal: Decimal, matched: Decimal) -> Result<Decimal, RedcError> {
    if ideal.is_zero() {
        return Err(RedcError::DivisionByZero(
            "ideal value is 0, relative error is undefined".to_string(),
        ));
    }
    (ideal - matched)
        .abs()
        .checked_div(ideal.abs())
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|percent| percent.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .ok_or_else(|| {
            RedcError::InvalidInput(format!(
                "relative error of {} against {} is out of range",
                matched, ideal
            ))
        })
}

pub fn relative_error_f64(ideal: f64, matched: f64) -> Result<f64, RedcError> {
    if ideal == 0.0 {
        return Err(RedcError::DivisionByZero(
            "ideal value is 0, relative error is undefined".to_string(),
        ));
    }
    let percent = (ideal - matched).abs() / ideal.abs() * 100.0;
    Ok((percent * 100.0).round() / 100.0)
}

/// Resolve `ideal` to its nearest candidate and score the approximation.
pub fn match_value(ideal: Decimal, candidates: &[Decimal]) -> Result<CandidateMatch, RedcError> {
    let matched = nearest(ideal, candidates)?;
    Ok(CandidateMatch {
        ideal_value: ideal,
        matched_value: matched,
        relative_error_percent: relative_error(ideal, matched)?,
    })
}

pub fn match_value_f64(ideal: f64, candidates: &[f64]) -> Result<CandidateMatch<f64>, RedcError> {
    let matched = nearest_f64(ideal, candidates)?;
    Ok(CandidateMatch {
        ideal_value: ideal,
        matched_value: matched,
        relative_error_percent: relative_error_f64(ideal, matched)?,
    })
}
