//! Crate-level error type for bamgen.
//!
//! Each pipeline stage has its own error enum (`ExtractionError`,
//! `GenerationError`, `ConfigError`, `OutputError`). This module folds them into one
//! `Error` so callers that drive the whole pipeline can use a single
//! `Result` type.
//!
//! # Examples
//!
//! ```
//! use bamgen::core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     // Operations that might fail...
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::extraction::ExtractionError;
use crate::generation::GenerationError;
use crate::output::OutputError;

/// Result type for bamgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for bamgen operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Definition extraction error
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Code generation error
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Output file error
    #[error(transparent)]
    Output(#[from] OutputError),
}
