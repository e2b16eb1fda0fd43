//! Error types for the generation domain

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during code generation
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Cannot find the specified template file '{}'.", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("Unknown EventStream type '{0}', use Direct, Buffered or Orchestration")]
    InvalidMode(String),

    #[error("Template compile error: {0}")]
    TemplateCompileError(String),

    #[error("BAM definition is not well-formed XML: {0}")]
    MalformedDefinition(String),

    #[error("Template transform error: {0}")]
    TransformError(String),
}

/// Render an error and all of its sources as one line.
///
/// Tera reports the useful detail (line, column, offending token) in the
/// source chain rather than in the top-level message.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}
