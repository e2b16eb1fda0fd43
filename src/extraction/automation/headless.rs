//! Spreadsheet application run as an external headless office process.
//!
//! The office suite converts the workbook to xlsx in a scratch directory;
//! cells are then read from the converted copy. The locale override is set
//! on the child process environment only.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

use tempfile::TempDir;
use tracing::{debug, info, warn};

use super::{EmbeddedApplication, SpreadsheetApplication};
use crate::extraction::{ExtractionError, Locale};

/// Drives `soffice --headless` (or a compatible command)
pub struct HeadlessOfficeApplication {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
    scratch: Option<TempDir>,
    converted: EmbeddedApplication,
}

impl HeadlessOfficeApplication {
    pub fn new<S: Into<String>>(program: S) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            child: None,
            scratch: None,
            converted: EmbeddedApplication::new(),
        }
    }

    /// Arguments placed before the conversion arguments
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    fn spawn(&self, path: &Path, outdir: &Path, locale: &Locale) -> Result<Child, ExtractionError> {
        let posix_locale = locale.posix_name();
        debug!(program = %self.program, locale = %posix_locale, "Starting office process");

        Command::new(&self.program)
            .args(&self.args)
            .args(["--headless", "--norestore", "--nologo", "--convert-to", "xlsx"])
            .arg("--outdir")
            .arg(outdir)
            .arg(path)
            .env("LC_ALL", &posix_locale)
            .env("LANG", &posix_locale)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    ExtractionError::BackendUnavailable(format!(
                        "Legacy export requires LibreOffice; '{}' was not found.",
                        self.program
                    ))
                } else {
                    ExtractionError::backend(format!("Failed to start '{}': {e}", self.program))
                }
            })
    }

    fn converted_path(outdir: &Path, source: &Path) -> Result<PathBuf, ExtractionError> {
        let stem = source.file_stem().ok_or_else(|| {
            ExtractionError::backend(format!("'{}' has no file name", source.display()))
        })?;
        let mut name = stem.to_os_string();
        name.push(".xlsx");
        Ok(outdir.join(name))
    }
}

impl SpreadsheetApplication for HeadlessOfficeApplication {
    fn open_workbook(&mut self, path: &Path, locale: &Locale) -> Result<(), ExtractionError> {
        let source = path.canonicalize().map_err(|e| {
            ExtractionError::backend(format!("Cannot resolve '{}': {e}", path.display()))
        })?;
        let scratch = tempfile::Builder::new()
            .prefix("bamgen-")
            .tempdir()
            .map_err(|e| ExtractionError::backend(format!("Cannot create scratch directory: {e}")))?;
        let outdir = scratch.path().to_path_buf();
        self.scratch = Some(scratch);

        let child = self.spawn(&source, &outdir, locale)?;
        let child = self.child.insert(child);
        let status = child.wait().map_err(|e| {
            ExtractionError::backend(format!("Failed waiting for '{}': {e}", self.program))
        })?;
        self.child = None;

        if !status.success() {
            return Err(ExtractionError::backend(format!(
                "'{}' failed to convert the workbook ({status})",
                self.program
            )));
        }

        let converted = Self::converted_path(&outdir, &source)?;
        if !converted.is_file() {
            return Err(ExtractionError::backend(format!(
                "'{}' did not produce '{}'",
                self.program,
                converted.display()
            )));
        }
        info!(program = %self.program, "Converted workbook with office process");
        self.converted.open_workbook(&converted, locale)
    }

    fn select_sheet(&mut self, name: &str) -> Result<(), ExtractionError> {
        self.converted.select_sheet(name)
    }

    fn read_cell(&mut self, row: u32, column: u32) -> Result<Option<String>, ExtractionError> {
        self.converted.read_cell(row, column)
    }

    fn quit(&mut self) -> Result<(), ExtractionError> {
        if let Some(mut child) = self.child.take() {
            terminate(&mut child);
        }

        self.converted.quit()?;

        if let Some(scratch) = self.scratch.take() {
            scratch.close().map_err(|e| {
                ExtractionError::backend(format!("Failed to remove scratch directory: {e}"))
            })?;
        }
        Ok(())
    }
}

/// Kill `child` if it is still running and reap it
fn terminate(child: &mut Child) {
    if let Ok(None) = child.try_wait() {
        debug!(pid = child.id(), "Terminating office process");
        if let Err(e) = child.kill() {
            warn!(pid = child.id(), error = %e, "Failed to kill office process");
        }
    }
    if let Err(e) = child.wait() {
        warn!(pid = child.id(), error = %e, "Failed to reap office process");
    }
}
