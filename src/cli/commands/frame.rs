//! `tendo frame` command - Bounding frame and camera distances for a result

use console::style;
use miette::Result;
use nalgebra::Point3;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::helpers::{format_point, format_value, load_config};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::frame::{compute_frame_with, renderable_segments, valid_points, CameraBounds, FramingConfig};
use crate::core::units::DisplayPolicy;
use crate::model::{load_result, ComputationResult};

#[derive(clap::Args, Debug)]
pub struct FrameArgs {
    /// Result JSON file ("-" reads stdin)
    pub file: PathBuf,
}

/// What the preview would frame for a result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSummary {
    pub center: Point3<f64>,
    pub size: f64,
    pub camera: CameraBounds,
    /// Valid points used for framing
    pub points: usize,
    pub invalid_points: usize,
    pub segments: usize,
    /// Segments with at least two valid points
    pub renderable_segments: usize,
}

impl FrameSummary {
    pub fn from_result(result: &ComputationResult, config: &FramingConfig) -> Self {
        let frame = compute_frame_with(&result.segments, config);
        let total: usize = result.segments.iter().map(Vec::len).sum();
        let points = valid_points(&result.segments).count();
        Self {
            center: frame.center,
            size: frame.size,
            camera: frame.camera(config),
            points,
            invalid_points: total - points,
            segments: result.segments.len(),
            renderable_segments: renderable_segments(&result.segments).len(),
        }
    }
}

pub fn run(args: FrameArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let result = load_result(&args.file)?;
    let summary = FrameSummary::from_result(&result, &config.framing);

    if summary.points == 0 {
        log::warn!("No valid points in {}, using the default frame", args.file.display());
    }

    print_summary(&summary, global.format, &config.display.policy())
}

/// Print a summary in the requested format
pub fn print_summary(summary: &FrameSummary, format: OutputFormat, policy: &DisplayPolicy) -> Result<()> {
    let format = effective_format(format, false);
    if print_structured(summary, format)? {
        return Ok(());
    }

    let value = |v: f64| format_value(v, policy);
    match format {
        OutputFormat::Tsv => {
            println!("center\t{}\t{}\t{}", value(summary.center.x), value(summary.center.y), value(summary.center.z));
            println!("size\t{}", value(summary.size));
            println!("distance\t{}", value(summary.camera.distance));
            println!("min_distance\t{}", value(summary.camera.min_distance));
            println!("max_distance\t{}", value(summary.camera.max_distance));
            println!("points\t{}", summary.points);
            println!("invalid_points\t{}", summary.invalid_points);
            println!("segments\t{}", summary.segments);
            println!("renderable_segments\t{}", summary.renderable_segments);
        }
        _ => {
            println!("{}", style("Frame").bold());
            println!("  {:<10} {}", style("center").dim(), format_point(&summary.center, policy));
            println!("  {:<10} {}", style("size").dim(), style(value(summary.size)).cyan());
            println!(
                "  {:<10} {} (min {}, max {})",
                style("camera").dim(),
                value(summary.camera.distance),
                value(summary.camera.min_distance),
                value(summary.camera.max_distance)
            );
            let invalid = if summary.invalid_points > 0 {
                style(format!("{} invalid", summary.invalid_points)).yellow()
            } else {
                style("0 invalid".to_string()).dim()
            };
            println!("  {:<10} {} ({})", style("points").dim(), summary.points, invalid);
            println!(
                "  {:<10} {} ({} renderable)",
                style("segments").dim(),
                summary.segments,
                summary.renderable_segments
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_invalid_points() {
        let result = ComputationResult {
            segments: vec![
                vec![vec![0.0, 0.0, 0.0], vec![f64::NAN, 0.0, 1.0], vec![0.0, 0.0, 2.0]],
                vec![vec![1.0, 1.0]],
            ],
            ..ComputationResult::default()
        };
        let summary = FrameSummary::from_result(&result, &FramingConfig::default());
        assert_eq!(summary.points, 2);
        assert_eq!(summary.invalid_points, 2);
        assert_eq!(summary.segments, 2);
        assert_eq!(summary.renderable_segments, 1);
        assert_eq!(summary.size, 2.0);
        assert_eq!(summary.center, Point3::new(0.0, 0.0, 1.0));
        assert_eq!(summary.camera.distance, 3.0);
    }

    #[test]
    fn test_empty_result_uses_fallback() {
        let summary = FrameSummary::from_result(&ComputationResult::default(), &FramingConfig::default());
        assert_eq!(summary.points, 0);
        assert_eq!(summary.size, 100.0);
        assert_eq!(summary.center, Point3::origin());
        assert_eq!(summary.camera.distance, 150.0);
    }
}
