//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use console::style;
use miette::Result;
use nalgebra::Point3;

use crate::cli::GlobalOpts;
use crate::core::palette::Color;
use crate::core::units::DisplayPolicy;
use crate::core::Config;

/// Load configuration honoring `--config`
pub fn load_config(global: &GlobalOpts) -> Result<Config> {
    Ok(Config::load(global.config.as_deref())?)
}

/// Format a number after applying a display policy
///
/// With a precision, exactly that many decimals are printed; otherwise the
/// shortest exact representation is used.
pub fn format_value(value: f64, policy: &DisplayPolicy) -> String {
    let shown = policy.apply(value);
    match policy.precision {
        Some(decimals) => format!("{:.*}", decimals as usize, shown),
        None => format!("{}", shown),
    }
}

/// Format a point as `(x, y, z)`
pub fn format_point(point: &Point3<f64>, policy: &DisplayPolicy) -> String {
    format!(
        "({}, {}, {})",
        format_value(point.x, policy),
        format_value(point.y, policy),
        format_value(point.z, policy)
    )
}

/// Colored bullet for a palette color, plain on non-terminals
pub fn swatch(color: Color) -> String {
    style("●").color256(color.ansi256()).to_string()
}

/// Truncate a string to max_len, adding "..." if truncated
///
/// Useful for table columns that need fixed-width output.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Escape a field for TSV output
pub fn escape_tsv(s: &str) -> String {
    s.replace('\t', " ").replace('\n', " ")
}
