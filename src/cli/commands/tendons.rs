//! `tendo tendons` command - Tendon actuation commands for a result

use console::style;
use miette::Result;
use serde::Serialize;
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::{escape_tsv, format_value, load_config, swatch, truncate_str};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::viz::{render_change_bar, BAR_WIDTH};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::palette::{color_for, Color};
use crate::core::units::LengthUnit;
use crate::model::{load_result, PullDirection};

#[derive(clap::Args, Debug)]
pub struct TendonsArgs {
    /// Result JSON file ("-" reads stdin)
    pub file: PathBuf,

    /// Length unit for changes: mm, cm or m (default: from config)
    #[arg(long, short = 'u')]
    pub unit: Option<String>,
}

/// One tendon's command in display units
#[derive(Debug, Serialize)]
struct TendonReport {
    id: String,
    color: Color,
    pull_direction: PullDirection,
    length_change: f64,
    magnitude: f64,
    unit: LengthUnit,
    /// Reported direction agrees with the sign of the change
    consistent: bool,
}

#[derive(Tabled)]
struct TendonRow {
    #[tabled(rename = "Tendon")]
    id: String,
    #[tabled(rename = "Color")]
    color: String,
    #[tabled(rename = "Direction")]
    direction: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Magnitude")]
    magnitude: String,
    #[tabled(rename = "OK")]
    consistent: String,
    #[tabled(rename = "Pull ← │ → Release")]
    bar: String,
}

pub fn run(args: TendonsArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let unit = match &args.unit {
        Some(key) => key.parse::<LengthUnit>()?,
        None => config.display.length_unit,
    };

    let result = load_result(&args.file)?;
    let commands = result.analysis.ordered_commands();

    let reports: Vec<TendonReport> = commands
        .iter()
        .map(|(id, cmd)| {
            if !cmd.is_consistent() {
                log::warn!(
                    "Tendon {}: direction '{}' disagrees with length change {}",
                    id,
                    cmd.pull_direction,
                    cmd.length_change_m
                );
            }
            TendonReport {
                id: id.to_string(),
                color: color_for(id),
                pull_direction: cmd.pull_direction,
                length_change: unit.from_si(cmd.length_change_m),
                magnitude: unit.from_si(cmd.magnitude()),
                unit,
                consistent: cmd.is_consistent(),
            }
        })
        .collect();

    let format = effective_format(global.format, true);
    if print_structured(&reports, format)? {
        return Ok(());
    }

    let policy = config.display.policy();
    if format == OutputFormat::Tsv {
        for report in &reports {
            println!(
                "{}\t{}\t{}\t{}\t{}\t{}",
                escape_tsv(&report.id),
                report.color,
                report.pull_direction,
                format_value(report.length_change, &policy),
                format_value(report.magnitude, &policy),
                report.consistent
            );
        }
        return Ok(());
    }

    if reports.is_empty() {
        println!("No actuation commands in {}", args.file.display());
        return Ok(());
    }

    let limit = reports
        .iter()
        .map(|r| r.length_change.abs())
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max);

    let rows: Vec<TendonRow> = reports
        .iter()
        .map(|r| TendonRow {
            id: truncate_str(&r.id, 12),
            color: r.color.to_string(),
            direction: r.pull_direction.to_string(),
            change: format!("{} {}", format_value(r.length_change, &policy), unit),
            magnitude: format!("{} {}", format_value(r.magnitude, &policy), unit),
            consistent: if r.consistent { "✓" } else { "✗" }.to_string(),
            bar: render_change_bar(r.length_change, limit, BAR_WIDTH),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    let legend: Vec<String> = reports
        .iter()
        .map(|r| format!("{} {}", swatch(r.color), r.id))
        .collect();
    println!("  {}", legend.join("  "));

    let inconsistent = reports.iter().filter(|r| !r.consistent).count();
    if inconsistent > 0 {
        println!(
            "{} {} command(s) report a direction that disagrees with the length change",
            style("!").yellow(),
            inconsistent
        );
    }
    Ok(())
}
