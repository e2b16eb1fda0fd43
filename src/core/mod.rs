//! Shared plumbing for the extraction and generation pipelines: the
//! crate-level error, configuration loading and identifier helpers.

pub mod config;
pub mod error;
pub mod utils;

pub use config::Config;
pub use error::Error;
