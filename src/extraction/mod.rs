//! Definition extraction.
//!
//! A BAM definition workbook keeps the definition XML on a hidden sheet,
//! split across consecutive cells because a single cell holds at most
//! 32,767 characters. This module finds the sheet and glues the fragments
//! back together.
//!
//! Two modes exist:
//! - **Direct** (default) opens the workbook through a fallback chain of
//!   data-access strategies and reads the sheet as a table.
//! - **Legacy** drives a spreadsheet application and walks the cells one by
//!   one, for environments where the direct backends cannot read the file.
//!
//! No limit is placed on the length of the definition or the number of
//! cells it spans.

pub mod automation;
mod cell;
pub mod errors;
pub mod locale;
pub mod reconstruct;
pub mod strategy;
pub mod tabular;

pub use errors::*;
pub use locale::Locale;
pub use reconstruct::CellLayout;

use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use automation::{EmbeddedApplication, HeadlessOfficeApplication, walk_definition};
use strategy::{ACCESS_STRATEGIES, open_first};
use tabular::{CalamineConnectionFactory, read_definition};

/// Name of the worksheet holding the definition
pub const DEFINITION_SHEET_NAME: &str = "BamXmlHiddenSheet";

/// How the workbook is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Tabular query through the access strategy chain
    #[default]
    Direct,
    /// Cell-by-cell walk through a spreadsheet application
    Legacy,
}

/// Spreadsheet application used by legacy mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// In-process workbook reader
    #[default]
    Embedded,
    /// External headless office suite
    Headless,
}

/// Extraction settings, also the `[extraction]` table of the config file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractionOptions {
    pub sheet_name: String,
    pub layout: CellLayout,
    pub locale: Locale,
    pub driver: DriverKind,
    pub office_command: String,
    pub office_args: Vec<String>,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            sheet_name: DEFINITION_SHEET_NAME.to_string(),
            layout: CellLayout::default(),
            locale: Locale::default(),
            driver: DriverKind::default(),
            office_command: "soffice".to_string(),
            office_args: Vec::new(),
        }
    }
}

/// Extract the definition XML from `path` with default options
pub fn extract(path: &Path, mode: ExtractionMode) -> Result<String, ExtractionError> {
    Extractor::default().extract(path, mode)
}

/// Definition extractor
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    options: ExtractionOptions,
}

impl Extractor {
    pub fn new(options: ExtractionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    /// Extract the definition XML from `path`
    pub fn extract(&self, path: &Path, mode: ExtractionMode) -> Result<String, ExtractionError> {
        ensure_readable(path)?;

        let document = match mode {
            ExtractionMode::Direct => self.extract_direct(path)?,
            ExtractionMode::Legacy => self.extract_legacy(path)?,
        };

        info!(
            path = %path.display(),
            ?mode,
            length = document.len(),
            "Extracted BAM definition"
        );
        Ok(document)
    }

    fn extract_direct(&self, path: &Path) -> Result<String, ExtractionError> {
        let (mut connection, _strategy) =
            open_first(&CalamineConnectionFactory, &ACCESS_STRATEGIES, path)?;
        read_definition(
            &mut connection,
            &self.options.sheet_name,
            self.options.layout,
        )
    }

    fn extract_legacy(&self, path: &Path) -> Result<String, ExtractionError> {
        let options = &self.options;
        info!(driver = ?options.driver, locale = %options.locale, "Exporting in legacy mode");

        match options.driver {
            DriverKind::Embedded => walk_definition(
                EmbeddedApplication::new(),
                path,
                &options.sheet_name,
                options.layout,
                &options.locale,
            ),
            DriverKind::Headless => walk_definition(
                HeadlessOfficeApplication::new(options.office_command.clone())
                    .with_args(options.office_args.clone()),
                path,
                &options.sheet_name,
                options.layout,
                &options.locale,
            ),
        }
    }
}

fn ensure_readable(path: &Path) -> Result<(), ExtractionError> {
    if path.is_file() && File::open(path).is_ok() {
        Ok(())
    } else {
        Err(ExtractionError::NotFound(path.to_path_buf()))
    }
}
