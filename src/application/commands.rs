//! Requests and responses for the application layer

use std::path::PathBuf;

use crate::extraction::{ExtractionMode, ExtractionOptions};

/// Export the definition XML from a workbook to a file
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub workbook: PathBuf,
    pub output: PathBuf,
    pub mode: ExtractionMode,
    pub options: ExtractionOptions,
}

/// Result of an export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResponse {
    pub output: PathBuf,
    pub characters: usize,
}

/// Where the generator reads the definition from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionInput {
    /// Extract from a workbook in direct mode
    Workbook(PathBuf),
    /// Read an already exported definition file
    Xml(PathBuf),
}

/// Generate a typed API source file
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub input: DefinitionInput,
    pub output: PathBuf,
    pub mode: String,
    pub namespace: String,
    pub template: Option<PathBuf>,
    pub options: ExtractionOptions,
}

/// Result of a generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateResponse {
    pub output: PathBuf,
    pub bytes: usize,
}
