//! Pick a boost inductor from the built-in catalog.

use redc::prelude::*;

fn main() -> Result<(), RedcError> {
    let options = InductorOptions::default();
    let catalog = Catalog::builtin()?;
    let report = RedcCore::select_inductor(&catalog, &CategoryPriorityTable::default(), &options)?;

    println!(
        "Ripple {:.3} A, ideal {:.2} uH, standard {} uH ({}%)",
        report.ripple_current_a,
        report.standard.ideal_value,
        report.standard.matched_value,
        report.standard.relative_error_percent
    );
    for part in &report.parts {
        println!(
            "  {:<6} {:<8} DCR {:<7} Isat {:<6} {}",
            part.size, part.inductance, part.dcr, part.saturation_current, part.category
        );
    }
    Ok(())
}
