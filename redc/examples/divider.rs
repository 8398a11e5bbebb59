//! Resolve a feedback divider and print the five best combinations.

use redc::prelude::*;
use rust_decimal::Decimal;

fn main() -> Result<(), RedcError> {
    let mut args = std::env::args().skip(1);
    let vout: Decimal = args
        .next()
        .unwrap_or_else(|| "5.0".to_string())
        .parse()
        .map_err(|e| RedcError::InvalidInput(format!("vout: {}", e)))?;
    let vref: Decimal = args
        .next()
        .unwrap_or_else(|| "0.8".to_string())
        .parse()
        .map_err(|e| RedcError::InvalidInput(format!("vref: {}", e)))?;

    let options = DividerOptions::new(vout, vref);
    let report = RedcCore::solve_divider(&options)?;

    println!("Vout {} V from Vref {} V ({}):", vout, vref, report.series);
    for combination in report.combinations.iter().take(5) {
        println!(
            "  R1 {} -> R2 {} ({}%, {:.4} V)",
            combination.resistor_top.normalize(),
            combination.resistor_bottom.normalize(),
            combination.relative_error_percent,
            combination.achieved_vout(vref)?
        );
    }
    Ok(())
}
