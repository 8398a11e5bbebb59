//! Standard E-series resistor values.
//!
//! Each series is stored as its base mantissas in `[1.0, 10.0)`. Actual
//! resistor values are produced by multiplying the mantissas with decade
//! multipliers, using exact decimal arithmetic so that `4.7 * 10^3` is
//! exactly `4700`.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

use crate::core::RedcError;

/// Decade exponents used for the bottom (matched) resistor: 1 Ω .. 9.xx MΩ.
pub const ALL_DECADES: RangeInclusive<u32> = 0..=6;

/// Decade exponents swept for the top resistor: 1 kΩ .. 9.xx MΩ.
pub const TOP_DECADES: RangeInclusive<u32> = 3..=6;

const E6: &[Decimal] = &[dec!(1.0), dec!(1.5), dec!(2.2), dec!(3.3), dec!(4.7), dec!(6.8)];

const E12: &[Decimal] = &[
    dec!(1.0), dec!(1.2), dec!(1.5), dec!(1.8), dec!(2.2), dec!(2.7),
    dec!(3.3), dec!(3.9), dec!(4.7), dec!(5.6), dec!(6.8), dec!(8.2),
];

const E24: &[Decimal] = &[
    dec!(1.0), dec!(1.1), dec!(1.2), dec!(1.3), dec!(1.5), dec!(1.6),
    dec!(1.8), dec!(2.0), dec!(2.2), dec!(2.4), dec!(2.7), dec!(3.0),
    dec!(3.3), dec!(3.6), dec!(3.9), dec!(4.3), dec!(4.7), dec!(5.1),
    dec!(5.6), dec!(6.2), dec!(6.8), dec!(7.5), dec!(8.2), dec!(9.1),
];

const E48: &[Decimal] = &[
    dec!(1.00), dec!(1.05), dec!(1.10), dec!(1.15), dec!(1.21), dec!(1.27),
    dec!(1.33), dec!(1.40), dec!(1.47), dec!(1.54), dec!(1.62), dec!(1.69),
    dec!(1.78), dec!(1.87), dec!(1.96), dec!(2.05), dec!(2.15), dec!(2.26),
    dec!(2.37), dec!(2.49), dec!(2.61), dec!(2.74), dec!(2.87), dec!(3.01),
    dec!(3.16), dec!(3.32), dec!(3.48), dec!(3.65), dec!(3.83), dec!(4.02),
    dec!(4.22), dec!(4.42), dec!(4.64), dec!(4.87), dec!(5.11), dec!(5.36),
    dec!(5.62), dec!(5.90), dec!(6.19), dec!(6.49), dec!(6.81), dec!(7.15),
    dec!(7.50), dec!(7.87), dec!(8.25), dec!(8.66), dec!(9.09), dec!(9.53),
];

const E96: &[Decimal] = &[
    dec!(1.00), dec!(1.02), dec!(1.05), dec!(1.07), dec!(1.10), dec!(1.13),
    dec!(1.15), dec!(1.18), dec!(1.21), dec!(1.24), dec!(1.27), dec!(1.30),
    dec!(1.33), dec!(1.37), dec!(1.40), dec!(1.43), dec!(1.47), dec!(1.50),
    dec!(1.54), dec!(1.58), dec!(1.62), dec!(1.65), dec!(1.69), dec!(1.74),
    dec!(1.78), dec!(1.82), dec!(1.87), dec!(1.91), dec!(1.96), dec!(2.00),
    dec!(2.05), dec!(2.10), dec!(2.15), dec!(2.21), dec!(2.26), dec!(2.32),
    dec!(2.37), dec!(2.43), dec!(2.49), dec!(2.55), dec!(2.61), dec!(2.67),
    dec!(2.74), dec!(2.80), dec!(2.87), dec!(2.94), dec!(3.01), dec!(3.09),
    dec!(3.16), dec!(3.24), dec!(3.32), dec!(3.40), dec!(3.48), dec!(3.57),
    dec!(3.65), dec!(3.74), dec!(3.83), dec!(3.92), dec!(4.02), dec!(4.12),
    dec!(4.22), dec!(4.32), dec!(4.42), dec!(4.53), dec!(4.64), dec!(4.75),
    dec!(4.87), dec!(4.99), dec!(5.11), dec!(5.23), dec!(5.36), dec!(5.49),
    dec!(5.62), dec!(5.76), dec!(5.90), dec!(6.04), dec!(6.19), dec!(6.34),
    dec!(6.49), dec!(6.65), dec!(6.81), dec!(6.98), dec!(7.15), dec!(7.32),
    dec!(7.50), dec!(7.68), dec!(7.87), dec!(8.06), dec!(8.25), dec!(8.45),
    dec!(8.66), dec!(8.87), dec!(9.09), dec!(9.31), dec!(9.53), dec!(9.76),
];

/// An IEC 60063 preferred-number series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ESeries {
    E6,
    E12,
    #[default]
    E24,
    E48,
    E96,
}

impl ESeries {
    pub const ALL: [ESeries; 5] = [
        ESeries::E6,
        ESeries::E12,
        ESeries::E24,
        ESeries::E48,
        ESeries::E96,
    ];

    /// Base mantissas of the series, strictly increasing, starting at 1.0.
    pub fn mantissas(self) -> &'static [Decimal] {
        match self {
            ESeries::E6 => E6,
            ESeries::E12 => E12,
            ESeries::E24 => E24,
            ESeries::E48 => E48,
            ESeries::E96 => E96,
        }
    }

    /// Nominal tolerance of parts sold in this series, in percent.
    pub fn tolerance_percent(self) -> u32 {
        match self {
            ESeries::E6 => 20,
            ESeries::E12 => 10,
            ESeries::E24 => 5,
            ESeries::E48 => 2,
            ESeries::E96 => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ESeries::E6 => "E6",
            ESeries::E12 => "E12",
            ESeries::E24 => "E24",
            ESeries::E48 => "E48",
            ESeries::E96 => "E96",
        }
    }

    /// Every value of the series across the given decade exponents.
    pub fn values(self, exponents: RangeInclusive<u32>) -> Vec<Decimal> {
        value_range(self.mantissas(), &decade_multipliers(exponents))
    }
}

impl fmt::Display for ESeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ESeries {
    type Err = RedcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ESeries::ALL
            .into_iter()
            .find(|series| series.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RedcError::UnknownSeries(s.to_string()))
    }
}

/// Look up the mantissas of a series by name (case-insensitive).
pub fn standard_mantissas(series_id: &str) -> Result<&'static [Decimal], RedcError> {
    Ok(series_id.parse::<ESeries>()?.mantissas())
}

/// Powers of ten for each exponent in the range, in ascending order.
///
/// `Decimal` tops out just below 1e29, so exponents above 28 are dropped.
pub fn decade_multipliers(exponents: RangeInclusive<u32>) -> Vec<Decimal> {
    exponents
        .map_while(|exp| {
            10_i128
                .checked_pow(exp)
                .and_then(|power| Decimal::try_from_i128_with_scale(power, 0).ok())
        })
        .collect()
}

/// Cross product of mantissas and multipliers.
///
/// The result is mantissa-major: all decades of the first mantissa come
/// first. Nearest-value search breaks ties by position, so this order is
/// part of the contract. Products outside the `Decimal` range are left out.
pub fn value_range(mantissas: &[Decimal], multipliers: &[Decimal]) -> Vec<Decimal> {
    mantissas
        .iter()
        .flat_map(|mantissa| {
            multipliers
                .iter()
                .filter_map(move |multiplier| mantissa.checked_mul(*multiplier))
        })
        .collect()
}
