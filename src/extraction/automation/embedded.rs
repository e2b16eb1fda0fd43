//! In-process spreadsheet application backed by calamine

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use tracing::debug;

use super::SpreadsheetApplication;
use crate::extraction::cell::cell_text;
use crate::extraction::{ExtractionError, Locale};

/// Reads cells straight from the workbook file, one address at a time
#[derive(Default)]
pub struct EmbeddedApplication {
    workbook: Option<Sheets<BufReader<File>>>,
    sheet: Option<Range<Data>>,
    locale: Locale,
}

impl EmbeddedApplication {
    pub fn new() -> Self {
        Self::default()
    }

    fn workbook(&mut self) -> Result<&mut Sheets<BufReader<File>>, ExtractionError> {
        self.workbook
            .as_mut()
            .ok_or_else(|| ExtractionError::backend("No workbook is open"))
    }
}

impl SpreadsheetApplication for EmbeddedApplication {
    fn open_workbook(&mut self, path: &Path, locale: &Locale) -> Result<(), ExtractionError> {
        let workbook = open_workbook_auto(path).map_err(|e| {
            ExtractionError::backend(format!(
                "Failed to open workbook '{}': {e}",
                path.display()
            ))
        })?;
        debug!(path = %path.display(), %locale, "Opened workbook in embedded application");
        self.workbook = Some(workbook);
        self.sheet = None;
        self.locale = locale.clone();
        Ok(())
    }

    fn select_sheet(&mut self, name: &str) -> Result<(), ExtractionError> {
        let workbook = self.workbook()?;
        if !workbook.sheet_names().iter().any(|sheet| sheet == name) {
            return Err(ExtractionError::DefinitionNotFound(name.to_string()));
        }

        let range = workbook.worksheet_range(name).map_err(|e| {
            ExtractionError::backend(format!("Failed to read worksheet {name}: {e}"))
        })?;
        self.sheet = Some(range);
        Ok(())
    }

    fn read_cell(&mut self, row: u32, column: u32) -> Result<Option<String>, ExtractionError> {
        let sheet = self
            .sheet
            .as_ref()
            .ok_or_else(|| ExtractionError::backend("No worksheet is selected"))?;
        if row == 0 || column == 0 {
            return Err(ExtractionError::backend(format!(
                "Cell ({row}, {column}) is not a valid 1-based address"
            )));
        }

        Ok(sheet
            .get_value((row - 1, column - 1))
            .and_then(|data| cell_text(data, &self.locale)))
    }

    fn quit(&mut self) -> Result<(), ExtractionError> {
        self.sheet = None;
        if self.workbook.take().is_some() {
            debug!("Closed workbook in embedded application");
        }
        Ok(())
    }
}
