//! `tendo convert` command - Convert a value between display units and SI

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::helpers::{format_value, load_config};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::units::{convert_from_si, convert_to_si, DisplayPolicy, Mode, Unit, MAX_PRECISION};

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    /// Value to convert
    #[arg(allow_hyphen_values = true)]
    pub value: f64,

    /// Quantity the value measures
    #[arg(long, short = 'm', value_enum)]
    pub mode: Mode,

    /// Display unit: deg, rad, mm, cm or m (default: from config)
    #[arg(long, short = 'u')]
    pub unit: Option<String>,

    /// Treat the value as SI and convert it into the display unit
    #[arg(long)]
    pub from_si: bool,

    /// Decimal places to round the result to (0-15)
    #[arg(long, short = 'p', value_parser = clap::value_parser!(u32).range(0..=MAX_PRECISION as i64))]
    pub precision: Option<u32>,
}

#[derive(Debug, Serialize)]
struct Conversion {
    mode: Mode,
    input: f64,
    from: String,
    to: String,
    value: f64,
}

pub fn run(args: ConvertArgs, global: &GlobalOpts) -> Result<()> {
    let unit = match &args.unit {
        Some(key) => args.mode.parse_unit(key)?,
        None => {
            let config = load_config(global)?;
            match args.mode {
                Mode::Angle => Unit::from(config.display.angle_unit),
                Mode::Length => Unit::from(config.display.length_unit),
            }
        }
    };

    let (value, from, to) = if args.from_si {
        (
            convert_from_si(args.value, unit, args.mode)?,
            args.mode.si_unit(),
            unit,
        )
    } else {
        (
            convert_to_si(args.value, unit, args.mode)?,
            unit,
            args.mode.si_unit(),
        )
    };
    log::debug!("{} {} -> {} {}", args.value, from, value, to);

    let policy = match args.precision {
        Some(decimals) => DisplayPolicy::default().with_precision(decimals),
        None => DisplayPolicy::default(),
    };

    let conversion = Conversion {
        mode: args.mode,
        input: args.value,
        from: from.to_string(),
        to: to.to_string(),
        value: policy.apply(value),
    };

    let format = effective_format(global.format, false);
    if print_structured(&conversion, format)? {
        return Ok(());
    }

    match format {
        OutputFormat::Tsv => println!("{}", format_value(value, &policy)),
        _ => println!(
            "{} {} = {} {}",
            args.value,
            from,
            style(format_value(value, &policy)).cyan(),
            to
        ),
    }
    Ok(())
}
