//! Source-annotated YAML errors

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Failure to read or parse a YAML document
#[derive(Debug, Error, Diagnostic)]
pub enum YamlError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] YamlSyntaxError),

    #[error("Cannot read file: {0}")]
    #[diagnostic(code(tendo::yaml::io))]
    Io(#[from] std::io::Error),
}

/// YAML syntax or shape error pointing into the source
#[derive(Debug, Error, Diagnostic)]
#[error("Invalid YAML in {filename}: {message}")]
#[diagnostic(code(tendo::yaml::syntax))]
pub struct YamlSyntaxError {
    pub filename: String,
    pub message: String,
    #[source_code]
    pub src: NamedSource<String>,
    #[label("here")]
    pub span: Option<SourceSpan>,
}

impl YamlSyntaxError {
    /// Build from a serde_yml error, locating it in `content`
    pub fn from_serde_error(err: &serde_yml::Error, content: &str, filename: &str) -> Self {
        let span = err
            .location()
            .map(|loc| SourceSpan::from((loc.index().min(content.len()), 1usize)));
        Self {
            filename: filename.to_string(),
            message: err.to_string(),
            src: NamedSource::new(filename, content.to_string()),
            span,
        }
    }
}
