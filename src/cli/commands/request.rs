//! `tendo request` command - Build the SI request body for a design

use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::model::DesignFile;

#[derive(clap::Args, Debug)]
pub struct RequestArgs {
    /// Design file (YAML or JSON, display units)
    pub file: PathBuf,

    /// Write the request here instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: RequestArgs, global: &GlobalOpts) -> Result<()> {
    let design = DesignFile::load(&args.file)?;
    log::info!(
        "Loaded design with {} segment(s) in {}/{}",
        design.segment_count(),
        design.units.angle,
        design.units.length
    );

    if design.rotation_angles.len() != design.segment_count()
        || design.backbone_lengths.len() != design.segment_count()
    {
        log::warn!(
            "Per-segment lists differ in length: {} bending, {} rotation, {} backbone",
            design.bending_angles.len(),
            design.rotation_angles.len(),
            design.backbone_lengths.len()
        );
    }

    let request = design.to_request();
    let body = match global.format {
        OutputFormat::Yaml => serde_yml::to_string(&request).into_diagnostic()?,
        _ => format!("{}\n", serde_json::to_string_pretty(&request).into_diagnostic()?),
    };

    match &args.output {
        Some(path) => {
            fs::write(path, body).into_diagnostic()?;
            log::info!("Wrote request to {}", path.display());
        }
        None => print!("{}", body),
    }
    Ok(())
}
