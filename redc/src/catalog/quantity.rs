//! Tokenizer for unit-annotated quantities such as `4.7uH` or `100 nH`.
//!
//! Grammar: `ws* digits ('.' digits*)? ws* prefix? unit? ws*`, where a
//! number may also start with `.`, `prefix` is one of `p n u µ μ m` and
//! `unit` is a run of ASCII letters.

use serde::Serialize;

use crate::core::RedcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SiPrefix {
    Pico,
    Nano,
    Micro,
    Milli,
    None,
}

impl SiPrefix {
    fn from_char(c: char) -> Option<Self> {
        match c {
            'p' => Some(SiPrefix::Pico),
            'n' => Some(SiPrefix::Nano),
            'u' | 'µ' | 'μ' => Some(SiPrefix::Micro),
            'm' => Some(SiPrefix::Milli),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quantity {
    pub magnitude: f64,
    pub prefix: SiPrefix,
    pub unit: String,
}

impl Quantity {
    /// Value scaled to micro units (e.g. µH for an inductance).
    pub fn in_micro(&self) -> f64 {
        match self.prefix {
            SiPrefix::Pico => self.magnitude / 1e6,
            SiPrefix::Nano => self.magnitude / 1e3,
            SiPrefix::Micro => self.magnitude,
            SiPrefix::Milli => self.magnitude * 1e3,
            SiPrefix::None => self.magnitude * 1e6,
        }
    }
}

pub fn parse_quantity(text: &str) -> Result<Quantity, RedcError> {
    let unparsable = || RedcError::UnparsableQuantity(text.to_string());
    let trimmed = text.trim();

    let number_len = trimmed
        .char_indices()
        .scan(false, |seen_dot, (i, c)| match c {
            '0'..='9' => Some(i + 1),
            '.' if !*seen_dot => {
                *seen_dot = true;
                Some(i + 1)
            }
            _ => None,
        })
        .last()
        .unwrap_or(0);

    let (number, rest) = trimmed.split_at(number_len);
    if !number.chars().any(|c| c.is_ascii_digit()) {
        return Err(unparsable());
    }
    let magnitude: f64 = number.parse().map_err(|_| unparsable())?;

    let rest = rest.trim_start();
    let mut chars = rest.chars();
    let (prefix, unit) = match chars.next().and_then(SiPrefix::from_char) {
        Some(prefix) => (prefix, chars.as_str()),
        None => (SiPrefix::None, rest),
    };
    if !unit.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(unparsable());
    }

    Ok(Quantity {
        magnitude,
        prefix,
        unit: unit.to_string(),
    })
}

/// Parse an inductance and normalise it to microhenries.
///
/// A bare number is taken as microhenries, which is how catalogs usually
/// list power inductors.
pub fn parse_inductance_uh(text: &str) -> Result<f64, RedcError> {
    let quantity = parse_quantity(text)?;
    match (quantity.prefix, quantity.unit.as_str()) {
        (SiPrefix::None, "") => Ok(quantity.magnitude),
        (_, "" | "H" | "h") => Ok(quantity.in_micro()),
        _ => Err(RedcError::UnparsableQuantity(text.to_string())),
    }
}
