//! Closed-form feedback divider and boost inductor equations.
//!
//! Divider: `Vout = Vref * (1 + R1 / R2)`, with R1 the top resistor.
//! Nothing here rounds; rounding belongs to reporting.

use rust_decimal::Decimal;

use crate::core::RedcError;

fn check_divider(vout: Decimal, vref: Decimal) -> Result<(), RedcError> {
    if vref.is_zero() {
        return Err(RedcError::DegenerateCircuit("Vref cannot be 0".to_string()));
    }
    if vout == vref {
        return Err(RedcError::DegenerateCircuit(format!(
            "Vout equals Vref ({}), the divider ratio is undefined",
            vref
        )));
    }
    Ok(())
}

/// Bottom resistor (R2) that yields `vout` for a given top resistor.
pub fn ideal_bottom_resistor(
    vout: Decimal,
    vref: Decimal,
    top_resistor: Decimal,
) -> Result<Decimal, RedcError> {
    check_divider(vout, vref)?;
    let ratio = vout
        .checked_div(vref)
        .map(|r| r - Decimal::ONE)
        .filter(|r| !r.is_zero())
        .ok_or_else(|| RedcError::DegenerateCircuit(format!("Vout/Vref - 1 is 0 for Vout={}", vout)))?;
    top_resistor
        .checked_div(ratio)
        .ok_or_else(|| RedcError::DegenerateCircuit("bottom resistor overflow".to_string()))
}

/// Top resistor (R1) that yields `vout` for a given bottom resistor.
pub fn ideal_top_resistor(
    vout: Decimal,
    vref: Decimal,
    bottom_resistor: Decimal,
) -> Result<Decimal, RedcError> {
    check_divider(vout, vref)?;
    let scaled = bottom_resistor.checked_mul(vref).ok_or_else(|| {
        RedcError::InvalidInput(format!(
            "R2 {} x Vref {} is out of range",
            bottom_resistor, vref
        ))
    })?;
    scaled
        .checked_div(vout - vref)
        .ok_or_else(|| RedcError::DegenerateCircuit("top resistor overflow".to_string()))
}

/// Output voltage actually produced by a resistor pair.
pub fn divider_output(
    vref: Decimal,
    top_resistor: Decimal,
    bottom_resistor: Decimal,
) -> Result<Decimal, RedcError> {
    let ratio = top_resistor
        .checked_div(bottom_resistor)
        .ok_or_else(|| RedcError::DivisionByZero("bottom resistor is 0".to_string()))?;
    Decimal::ONE
        .checked_add(ratio)
        .and_then(|gain| gain.checked_mul(vref))
        .ok_or_else(|| RedcError::InvalidInput(format!("divider output for Vref {} is out of range", vref)))
}

/// Peak-to-peak inductor ripple current of a boost converter, in amps.
pub fn ripple_current(iout: f64, vout: f64, vin: f64, ripple_ratio: f64) -> Result<f64, RedcError> {
    if vin == 0.0 {
        return Err(RedcError::DegenerateCircuit("Vin cannot be 0".to_string()));
    }
    Ok(ripple_ratio * iout * (vout / vin))
}

/// Boost converter inductance, in microhenries.
pub fn ideal_inductance_uh(vin: f64, vout: f64, delta_il: f64, fsw: f64) -> Result<f64, RedcError> {
    for (name, value) in [("Vin", vin), ("Vout", vout), ("ripple current", delta_il), ("fsw", fsw)] {
        if value == 0.0 {
            return Err(RedcError::DegenerateCircuit(format!("{} cannot be 0", name)));
        }
    }
    Ok(vin * (vout - vin) / (delta_il * fsw * vout) * 1e6)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn assert_close(a: Decimal, b: Decimal) {
        assert!((a - b).abs() < dec!(0.000000001), "{} != {}", a, b);
    }

    #[test]
    fn test_bottom_resistor_for_4k7() {
        let r2 = ideal_bottom_resistor(dec!(5.0), dec!(0.8), dec!(4700)).unwrap();
        // 4700 / 4.25
        assert_close(r2, dec!(1105.8823529411764705882352941));
    }

    #[test]
    fn test_top_and_bottom_are_inverse() {
        for (vout, vref) in [(dec!(5.0), dec!(0.8)), (dec!(3.3), dec!(0.6)), (dec!(12), dec!(1.25))] {
            for r in [dec!(1000), dec!(4700), dec!(68000), dec!(2200000)] {
                let bottom = ideal_bottom_resistor(vout, vref, r).unwrap();
                assert_close(ideal_top_resistor(vout, vref, bottom).unwrap(), r);

                let top = ideal_top_resistor(vout, vref, r).unwrap();
                assert_close(ideal_bottom_resistor(vout, vref, top).unwrap(), r);
            }
        }
    }

    #[test]
    fn test_degenerate_divider() {
        assert!(matches!(
            ideal_bottom_resistor(dec!(0.8), dec!(0.8), dec!(1000)),
            Err(RedcError::DegenerateCircuit(_))
        ));
        assert!(matches!(
            ideal_top_resistor(dec!(0.8), dec!(0.8), dec!(1000)),
            Err(RedcError::DegenerateCircuit(_))
        ));
        assert!(matches!(
            ideal_bottom_resistor(dec!(5), dec!(0), dec!(1000)),
            Err(RedcError::DegenerateCircuit(_))
        ));
    }

    #[test]
    fn test_divider_output() {
        let vout = divider_output(dec!(0.8), dec!(4700), dec!(1100)).unwrap();
        assert_close(vout, dec!(4.2181818181818181818181818182));
        assert!(divider_output(dec!(0.8), dec!(4700), dec!(0)).is_err());
    }

    #[test]
    fn test_huge_voltages_overflow_without_panic() {
        let vref = Decimal::from_i128_with_scale(10_i128.pow(22), 0);
        let vout = vref * dec!(2);
        assert!(matches!(
            ideal_top_resistor(vout, vref, dec!(9100000)),
            Err(RedcError::InvalidInput(_))
        ));
        assert!(matches!(
            divider_output(Decimal::MAX, dec!(4700), dec!(1100)),
            Err(RedcError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_boost_inductance() {
        let ripple = ripple_current(1.0, 12.0, 5.0, 0.3).unwrap();
        assert!((ripple - 0.72).abs() < 1e-12);

        let l = ideal_inductance_uh(5.0, 12.0, ripple, 500_000.0).unwrap();
        assert!((l - 8.101851851851851).abs() < 1e-9, "got {}", l);
    }

    #[test]
    fn test_inductor_zero_guards() {
        assert!(ripple_current(1.0, 12.0, 0.0, 0.3).is_err());
        assert!(ideal_inductance_uh(5.0, 12.0, 0.0, 500_000.0).is_err());
        assert!(ideal_inductance_uh(5.0, 12.0, 0.7, 0.0).is_err());
        assert!(ideal_inductance_uh(5.0, 0.0, 0.7, 500_000.0).is_err());
        assert!(ideal_inductance_uh(0.0, 12.0, 0.7, 500_000.0).is_err());
    }
}
