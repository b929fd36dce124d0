//! `tendo palette` command - Show the colors assigned to tendon ids

use miette::Result;
use serde::Serialize;

use crate::cli::helpers::swatch;
use crate::cli::output::{effective_format, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::palette::{color_for, palette_index, Color, FALLBACK_COLOR, PALETTE_SIZE};

#[derive(clap::Args, Debug)]
pub struct PaletteArgs {
    /// Tendon ids to look up (default: 1 through 12)
    #[arg(allow_hyphen_values = true)]
    pub ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PaletteEntry {
    id: String,
    /// Palette slot, absent for ids that fall back to gray
    index: Option<usize>,
    color: Color,
}

pub fn run(args: PaletteArgs, global: &GlobalOpts) -> Result<()> {
    let listing = args.ids.is_empty();
    let ids: Vec<String> = if listing {
        (1..=PALETTE_SIZE).map(|i| i.to_string()).collect()
    } else {
        args.ids
    };

    let entries: Vec<PaletteEntry> = ids
        .into_iter()
        .map(|id| PaletteEntry {
            index: palette_index(&id),
            color: color_for(&id),
            id,
        })
        .collect();

    let format = effective_format(global.format, true);
    if print_structured(&entries, format)? {
        return Ok(());
    }

    for entry in &entries {
        let index = entry
            .index
            .map(|i| i.to_string())
            .unwrap_or_else(|| "-".to_string());
        match format {
            OutputFormat::Tsv => println!("{}\t{}\t{}", entry.id, index, entry.color),
            _ => println!(
                "  {:>6}  {:>2}  {} {}",
                entry.id,
                index,
                swatch(entry.color),
                entry.color
            ),
        }
    }

    if listing && format != OutputFormat::Tsv {
        println!(
            "  {:>6}  {:>2}  {} {}",
            "other",
            "-",
            swatch(FALLBACK_COLOR),
            FALLBACK_COLOR
        );
    }
    Ok(())
}
