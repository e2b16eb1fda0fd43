//! Legacy extraction: drive a spreadsheet application and walk the hidden
//! sheet one cell at a time.
//!
//! The application is reached through [`SpreadsheetApplication`]. Every
//! walk runs inside an [`ApplicationSession`], which quits the application
//! when it goes out of scope, so an error half-way through the walk never
//! leaves an application process behind.

mod embedded;
mod headless;

pub use embedded::EmbeddedApplication;
pub use headless::HeadlessOfficeApplication;

use std::path::Path;

use tracing::{debug, warn};

use crate::extraction::reconstruct::{CellLayout, reconstruct};
use crate::extraction::{ExtractionError, Locale};

/// Automation surface of a spreadsheet application
pub trait SpreadsheetApplication {
    /// Open a workbook, running the application under `locale`
    fn open_workbook(&mut self, path: &Path, locale: &Locale) -> Result<(), ExtractionError>;

    /// Make the sheet called `name` current.
    /// A missing sheet is [`ExtractionError::DefinitionNotFound`].
    fn select_sheet(&mut self, name: &str) -> Result<(), ExtractionError>;

    /// Value of a cell of the current sheet, 1-based like the application
    fn read_cell(&mut self, row: u32, column: u32) -> Result<Option<String>, ExtractionError>;

    /// Close the workbook and terminate the application
    fn quit(&mut self) -> Result<(), ExtractionError>;
}

/// Scoped handle that quits the application on every exit path
pub struct ApplicationSession<A: SpreadsheetApplication> {
    application: A,
    finished: bool,
}

impl<A: SpreadsheetApplication> ApplicationSession<A> {
    pub fn new(application: A) -> Self {
        Self {
            application,
            finished: false,
        }
    }

    pub fn application(&mut self) -> &mut A {
        &mut self.application
    }

    /// Quit explicitly so a failure to terminate can be reported
    pub fn quit(mut self) -> Result<(), ExtractionError> {
        self.finished = true;
        self.application.quit()
    }
}

impl<A: SpreadsheetApplication> Drop for ApplicationSession<A> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        debug!("Quitting spreadsheet application after an early exit");
        if let Err(e) = self.application.quit() {
            warn!(error = %e, "Failed to quit spreadsheet application");
        }
    }
}

/// Walk the hidden sheet cell by cell and reassemble the definition
pub fn walk_definition<A: SpreadsheetApplication>(
    application: A,
    path: &Path,
    sheet: &str,
    layout: CellLayout,
    locale: &Locale,
) -> Result<String, ExtractionError> {
    let mut session = ApplicationSession::new(application);
    session.application().open_workbook(path, locale)?;
    session.application().select_sheet(sheet)?;

    let document = {
        let application = session.application();
        reconstruct((0..u32::MAX).map(|index| {
            let (row, column) = layout.address(index, 1);
            application.read_cell(row, column)
        }))?
    };

    session.quit()?;

    if document.is_empty() {
        return Err(ExtractionError::DefinitionEmpty);
    }
    Ok(document)
}
