//! `tendo view` command - Draw a result in the terminal

use miette::Result;
use std::path::PathBuf;

use crate::cli::helpers::load_config;
use crate::cli::viz::{render_view, Plane, VIEW_HEIGHT, VIEW_WIDTH};
use crate::cli::GlobalOpts;
use crate::core::frame::{compute_frame_with, renderable_segments};
use crate::model::load_result;

#[derive(clap::Args, Debug)]
pub struct ViewArgs {
    /// Result JSON file ("-" reads stdin)
    pub file: PathBuf,

    /// Projection plane
    #[arg(long, value_enum, default_value_t = Plane::Xz)]
    pub plane: Plane,

    /// Canvas width in braille dots
    #[arg(long, default_value_t = VIEW_WIDTH)]
    pub width: u32,

    /// Canvas height in braille dots
    #[arg(long, default_value_t = VIEW_HEIGHT)]
    pub height: u32,

    /// Hide tendon paths
    #[arg(long)]
    pub no_tendons: bool,

    /// Hide coupling elements
    #[arg(long)]
    pub no_couplings: bool,
}

pub fn run(args: ViewArgs, global: &GlobalOpts) -> Result<()> {
    if args.width == 0 || args.height == 0 {
        return Err(miette::miette!("Canvas width and height must be positive"));
    }

    let config = load_config(global)?;
    let result = load_result(&args.file)?;

    let frame = compute_frame_with(&result.segments, &config.framing);
    let segments = renderable_segments(&result.segments);
    let tendons = if args.no_tendons {
        Vec::new()
    } else {
        result.analysis.tendon_paths()
    };
    let couplings = if args.no_couplings {
        Vec::new()
    } else {
        result.analysis.coupling_positions()
    };
    log::debug!(
        "Drawing {} segment(s), {} tendon path(s), {} coupling(s)",
        segments.len(),
        tendons.len(),
        couplings.len()
    );

    println!(
        "{}",
        render_view(
            &segments,
            &tendons,
            &couplings,
            &frame,
            args.plane,
            args.width,
            args.height
        )
    );
    Ok(())
}
