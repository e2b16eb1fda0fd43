//! Error types for the extraction domain

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while pulling the definition out of a workbook
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("File '{}' does not exist or is unavailable.", .0.display())]
    NotFound(PathBuf),

    #[error("Could not open the workbook with any available backend. {0}")]
    BackendUnavailable(String),

    #[error("Could not find hidden BAM worksheet {0}.")]
    DefinitionNotFound(String),

    #[error(
        "Could not find hidden BAM worksheet or found no BAM XML on the worksheet. Expected to find BAM XML at the first cell of the hidden worksheet."
    )]
    DefinitionEmpty,

    #[error("Backend error: {0}")]
    BackendError(String),
}

impl ExtractionError {
    /// Create a generic backend error
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Self::BackendError(msg.into())
    }
}
