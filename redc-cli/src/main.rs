//! redc CLI - DC-DC feedback divider and inductor value selection from the command line.

use clap::{Parser, Subcommand, ValueEnum};
use redc::{
    Catalog, CategoryPriorityTable, DividerCombination, DividerOptions, DividerReport, ESeries,
    InductorOptions, InductorReport, RedcCore, RedcError, SweepSide,
};
use rust_decimal::{Decimal, RoundingStrategy};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "redc")]
#[command(about = "DC-DC feedback divider resistor combination calculator", long_about = None)]
#[command(version)]
struct Cli {
    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank feedback divider resistor combinations
    Calc {
        /// Output voltage (V)
        #[arg(short = 'o', long)]
        vout: Decimal,

        /// Reference voltage (V)
        #[arg(short = 'r', long)]
        vref: Decimal,

        /// CSV file the ranked combinations are saved to
        #[arg(short, long, default_value = "./resistor_combination.csv")]
        save: PathBuf,

        /// Do not write the CSV file
        #[arg(long)]
        no_save: bool,

        /// E-series (E6, E12, E24, E48, E96)
        #[arg(short = 'e', long = "serie", visible_alias = "series", default_value = "E24")]
        serie: String,

        /// Preferred top resistor (Ω); reports the combination closest to it
        #[arg(short, long)]
        target: Option<Decimal>,

        /// Sweep the bottom resistor and match the top one
        #[arg(long)]
        fix_bottom: bool,

        /// Group rows by relative error
        #[arg(short, long)]
        grouped: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Size a boost inductor and list matching catalog parts
    Inductor {
        /// Input voltage (V)
        #[arg(long)]
        vin: f64,

        /// Output voltage (V)
        #[arg(long)]
        vout: f64,

        /// Output current (A)
        #[arg(long)]
        iout: f64,

        /// Switching frequency (Hz)
        #[arg(long)]
        fsw: f64,

        /// Ripple current as a fraction of the inductor current
        #[arg(long, default_value_t = 0.3)]
        ripple: f64,

        /// Inductor catalog CSV (defaults to the built-in catalog)
        #[arg(long, value_name = "CSV")]
        catalog: Option<PathBuf>,

        /// Category priority JSON (array of types in preferred order)
        #[arg(long, value_name = "JSON")]
        priority: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List supported E-series
    Series {
        /// Show every mantissa of each series
        #[arg(short, long)]
        all: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON report
    Json,
    /// CSV rows on stdout
    Csv,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match cli.command {
        Commands::Calc {
            vout,
            vref,
            save,
            no_save,
            serie,
            target,
            fix_bottom,
            grouped,
            format,
        } => {
            let save = (!no_save).then_some(save);
            report_error(handle_calc(
                vout, vref, &serie, save, target, fix_bottom, grouped, format,
            ))
        }
        Commands::Inductor {
            vin,
            vout,
            iout,
            fsw,
            ripple,
            catalog,
            priority,
            format,
        } => {
            let options = InductorOptions {
                vin,
                vout,
                iout,
                fsw_hz: fsw,
                ripple_ratio: ripple,
            };
            report_error(handle_inductor(
                options,
                catalog.as_deref(),
                priority.as_deref(),
                format,
            ))
        }
        Commands::Series { all } => {
            handle_series(all);
            0
        }
    };

    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn report_error(result: Result<(), RedcError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            e.exit_code()
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_calc(
    vout: Decimal,
    vref: Decimal,
    serie: &str,
    save: Option<PathBuf>,
    target: Option<Decimal>,
    fix_bottom: bool,
    grouped: bool,
    format: OutputFormat,
) -> Result<(), RedcError> {
    let options = DividerOptions {
        vout,
        vref,
        series: serie.parse::<ESeries>()?,
        save_path: save,
        target_top: target,
        sweep: if fix_bottom {
            SweepSide::Bottom
        } else {
            SweepSide::Top
        },
    };

    let report = RedcCore::solve_divider(&options)?;

    match format {
        OutputFormat::Human => output_divider_human(&report, grouped),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            write_divider_csv(&mut writer, &report.combinations)?;
        }
    }

    if let Some(path) = &options.save_path {
        let mut writer = csv::Writer::from_path(path)?;
        write_divider_csv(&mut writer, &report.combinations)?;
        tracing::info!(
            "Saved {} combinations to {}",
            report.combinations.len(),
            path.display()
        );
    }

    Ok(())
}

/// Round to 2 decimal places, keeping at least one fractional digit.
fn format_decimal(value: Decimal) -> String {
    let text = value
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
        .to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Resistance with a K or M suffix, e.g. `4.7K`, `1.0M`, `680.0`.
fn format_unit(value: Decimal) -> String {
    let mega = Decimal::from(1_000_000);
    let kilo = Decimal::from(1_000);
    if value >= mega {
        format!("{}M", format_decimal(value / mega))
    } else if value >= kilo {
        format!("{}K", format_decimal(value / kilo))
    } else {
        format_decimal(value)
    }
}

fn format_row(combination: &DividerCombination) -> String {
    format!(
        "R1: {} -> R2: {} -> Diff: {}%",
        format_unit(combination.resistor_top),
        format_unit(combination.resistor_bottom),
        format_decimal(combination.relative_error_percent)
    )
}

fn output_divider_human(report: &DividerReport, grouped: bool) {
    if grouped {
        for band in report.bands() {
            println!(
                "\nDiff {}% ({} combinations)",
                format_decimal(band.relative_error_percent),
                band.combinations.len()
            );
            println!("{}", "─".repeat(40));
            for combination in band.combinations {
                println!(
                    "  R1: {} -> R2: {}",
                    format_unit(combination.resistor_top),
                    format_unit(combination.resistor_bottom)
                );
            }
        }
    } else {
        for combination in &report.combinations {
            println!("{}", format_row(combination));
        }
    }

    if let Some(best) = &report.best_target {
        println!("\nClosest to target:");
        println!("  {}", format_row(best));
        if let Ok(vout) = best.achieved_vout(report.vref) {
            println!("  Vout: {} V", format_decimal(vout));
        }
    }
}

fn write_divider_csv<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    combinations: &[DividerCombination],
) -> Result<(), RedcError> {
    writer.write_record(["R1", "R2", "Diff"])?;
    for combination in combinations {
        writer.write_record([
            format_unit(combination.resistor_top),
            format_unit(combination.resistor_bottom),
            format_decimal(combination.relative_error_percent),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn handle_inductor(
    options: InductorOptions,
    catalog: Option<&Path>,
    priority: Option<&Path>,
    format: OutputFormat,
) -> Result<(), RedcError> {
    let catalog = match catalog {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::builtin()?,
    };
    let priorities = match priority {
        Some(path) => CategoryPriorityTable::from_path(path)?,
        None => CategoryPriorityTable::default(),
    };

    let report = RedcCore::select_inductor(&catalog, &priorities, &options)?;

    match format {
        OutputFormat::Human => output_inductor_human(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            writer.write_record(["size", "inductance", "dcr", "saturation_current", "type"])?;
            for part in &report.parts {
                writer.write_record([
                    &part.size,
                    &part.inductance,
                    &part.dcr,
                    &part.saturation_current,
                    &part.category,
                ])?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

fn output_inductor_human(report: &InductorReport) {
    println!("Ripple current:      {:.3} A", report.ripple_current_a);
    println!("Ideal inductance:    {:.2} uH", report.standard.ideal_value);
    println!(
        "Standard inductance: {} uH -> Diff: {}%",
        report.standard.matched_value, report.standard.relative_error_percent
    );
    println!();
    println!(
        "  {:<8} {:<12} {:<10} {:<8} {}",
        "Size", "Inductance", "DCR", "Isat", "Type"
    );
    println!("  {}", "─".repeat(52));
    for part in &report.parts {
        println!(
            "  {:<8} {:<12} {:<10} {:<8} {}",
            part.size, part.inductance, part.dcr, part.saturation_current, part.category
        );
    }
}

fn handle_series(all: bool) {
    println!("Available E-series:\n");

    for series in ESeries::ALL {
        println!(
            "  {:<4} ±{}% tolerance, {} values per decade",
            series.name(),
            series.tolerance_percent(),
            series.mantissas().len()
        );
        if all {
            let values: Vec<String> = series.mantissas().iter().map(|m| m.to_string()).collect();
            println!("       {}", values.join(" "));
        }
    }
}
