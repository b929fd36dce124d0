//! Output formatting utilities

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io::IsTerminal;

use crate::cli::OutputFormat;

/// Determine the effective output format based on context
///
/// `Auto` becomes a table on a terminal. When piped, lists become TSV and
/// single records become JSON.
pub fn effective_format(format: OutputFormat, is_list: bool) -> OutputFormat {
    match format {
        OutputFormat::Auto => {
            if std::io::stdout().is_terminal() {
                OutputFormat::Table
            } else if is_list {
                OutputFormat::Tsv
            } else {
                OutputFormat::Json
            }
        }
        other => other,
    }
}

/// Print a value as JSON or YAML
///
/// Returns `false` without printing for the other formats.
pub fn print_structured<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(value).into_diagnostic()?;
            println!("{}", json);
            Ok(true)
        }
        OutputFormat::Yaml => {
            let yaml = serde_yml::to_string(value).into_diagnostic()?;
            print!("{}", yaml);
            Ok(true)
        }
        _ => Ok(false),
    }
}
