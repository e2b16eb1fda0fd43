//! Direct (tabular) extraction: query the hidden sheet as a table and
//! reassemble the definition from its first row.

use std::convert::Infallible;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Range, Reader, Sheets, Xls, Xlsb, Xlsx, open_workbook};
use tracing::debug;

use crate::extraction::cell::cell_text;
use crate::extraction::reconstruct::{CellLayout, reconstruct};
use crate::extraction::strategy::{AccessStrategy, ConnectionFactory, Provider};
use crate::extraction::{ExtractionError, Locale};

/// Failure modes of a sheet query
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The workbook has no sheet with the requested name
    SheetNotFound,
    /// Any other backend failure
    Backend(String),
}

/// Header-less table of nullable cell values anchored at the sheet origin.
///
/// `rows[0][0]` is always the first cell of the sheet (A1), even when the
/// sheet's used area starts further in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetTable {
    pub rows: Vec<Vec<Option<String>>>,
}

impl SheetTable {
    /// Cells in reading order for `layout`
    fn into_cells(self, layout: CellLayout) -> Vec<Option<String>> {
        match layout {
            CellLayout::Row => {
                if self.rows.len() > 1 {
                    debug!(
                        ignored_rows = self.rows.len() - 1,
                        "Only the first row holds the definition"
                    );
                }
                self.rows.into_iter().next().unwrap_or_default()
            }
            CellLayout::Column => self
                .rows
                .into_iter()
                .map(|row| row.into_iter().next().flatten())
                .collect(),
        }
    }
}

/// An open data-access connection to a workbook
pub trait TabularConnection {
    /// Read the whole sheet named `sheet` without treating any row as a header
    fn query_sheet(&mut self, sheet: &str) -> Result<SheetTable, QueryError>;
}

/// Read the definition stored in `sheet` through an open connection
pub fn read_definition<C: TabularConnection + ?Sized>(
    connection: &mut C,
    sheet: &str,
    layout: CellLayout,
) -> Result<String, ExtractionError> {
    let table = connection.query_sheet(sheet).map_err(|e| match e {
        QueryError::SheetNotFound => ExtractionError::DefinitionNotFound(sheet.to_string()),
        QueryError::Backend(message) => ExtractionError::BackendError(message),
    })?;

    let cells = table.into_cells(layout);
    let has_origin = matches!(cells.first(), Some(Some(value)) if !value.is_empty());
    if !has_origin {
        return Err(ExtractionError::DefinitionEmpty);
    }

    Ok(reconstruct(cells.into_iter().map(Ok::<_, Infallible>)).unwrap_or_else(|never| match never {}))
}

/// Workbook connection backed by calamine
pub struct CalamineConnection {
    workbook: Sheets<BufReader<File>>,
    path: PathBuf,
}

impl CalamineConnection {
    fn table_from_range(range: &Range<Data>) -> SheetTable {
        let locale = Locale::default();
        let Some((last_row, last_column)) = range.end() else {
            return SheetTable::default();
        };

        let rows = (0..=last_row)
            .map(|row| {
                (0..=last_column)
                    .map(|column| {
                        range
                            .get_value((row, column))
                            .and_then(|data| cell_text(data, &locale))
                    })
                    .collect()
            })
            .collect();

        SheetTable { rows }
    }
}

impl TabularConnection for CalamineConnection {
    fn query_sheet(&mut self, sheet: &str) -> Result<SheetTable, QueryError> {
        if !self.workbook.sheet_names().iter().any(|name| name == sheet) {
            return Err(QueryError::SheetNotFound);
        }

        let range = self
            .workbook
            .worksheet_range(sheet)
            .map_err(|e| QueryError::Backend(format!("Failed to read worksheet {sheet}: {e}")))?;

        debug!(sheet, dimensions = ?range.get_size(), "Queried worksheet");
        Ok(Self::table_from_range(&range))
    }
}

impl Drop for CalamineConnection {
    fn drop(&mut self) {
        debug!(path = %self.path.display(), "Closing workbook connection");
    }
}

/// Opens calamine connections for the built-in access strategies
#[derive(Debug, Default, Clone, Copy)]
pub struct CalamineConnectionFactory;

impl ConnectionFactory for CalamineConnectionFactory {
    type Connection = CalamineConnection;

    fn attempt_open(
        &self,
        strategy: &AccessStrategy,
        path: &Path,
    ) -> Result<Self::Connection, String> {
        let workbook = match strategy.provider {
            Provider::Xlsx => open_workbook::<Xlsx<_>, _>(path)
                .map(Sheets::Xlsx)
                .map_err(|e| e.to_string())?,
            Provider::Xlsb => open_workbook::<Xlsb<_>, _>(path)
                .map(Sheets::Xlsb)
                .map_err(|e| e.to_string())?,
            Provider::Xls => open_workbook::<Xls<_>, _>(path)
                .map(Sheets::Xls)
                .map_err(|e| e.to_string())?,
        };

        // A zip package without the provider's workbook part opens with no sheets
        if workbook.sheet_names().is_empty() {
            return Err(format!("{} found no worksheets in the package", strategy.provider));
        }

        Ok(CalamineConnection {
            workbook,
            path: path.to_path_buf(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::strategy::{ACCESS_STRATEGIES, open_first};
    use crate::extraction::{ExtractionMode, extract};
    use std::io::{Read, Write};
    use tracing_test::traced_test;

    fn write_xlsx(path: &Path) {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        workbook.add_worksheet().set_name("Definition").unwrap();
        let hidden = workbook.add_worksheet();
        hidden.set_name("BamXmlHiddenSheet").unwrap();
        hidden.write_string(0, 0, "<A/>").unwrap();
        workbook.save(path).unwrap();
    }

    /// Repackage an xlsx so its workbook part sits where an xlsb keeps it
    fn write_xlsb_shaped(xlsx: &Path, target: &Path) {
        let mut archive = zip::ZipArchive::new(File::open(xlsx).unwrap()).unwrap();
        let mut writer = zip::ZipWriter::new(File::create(target).unwrap());
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).unwrap();
            let mut bytes = Vec::new();
            entry.read_to_end(&mut bytes).unwrap();
            let name = match entry.name() {
                "xl/workbook.xml" => "xl/workbook.bin".to_string(),
                other => other.to_string(),
            };
            writer
                .start_file(name, zip::write::SimpleFileOptions::default())
                .unwrap();
            writer.write_all(&bytes).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_xlsx_strategy_opens_xlsx_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("BAMDefinition.xlsx");
        write_xlsx(&path);

        let (mut connection, strategy) =
            open_first(&CalamineConnectionFactory, &ACCESS_STRATEGIES, &path).unwrap();
        assert_eq!(strategy.provider, Provider::Xlsx);
        assert_eq!(
            read_definition(&mut connection, "BamXmlHiddenSheet", CellLayout::Row).unwrap(),
            "<A/>"
        );
    }

    #[test]
    fn test_xlsx_strategy_refuses_package_without_workbook_part() {
        let dir = tempfile::tempdir().unwrap();
        let xlsx = dir.path().join("source.xlsx");
        write_xlsx(&xlsx);
        let xlsb = dir.path().join("BAMDefinition.xlsb");
        write_xlsb_shaped(&xlsx, &xlsb);

        let reason = CalamineConnectionFactory
            .attempt_open(&ACCESS_STRATEGIES[0], &xlsb)
            .err()
            .unwrap();
        assert!(reason.contains("no worksheets"), "{reason}");
    }

    #[traced_test]
    #[test]
    fn test_xlsb_package_falls_through_past_xlsx_strategy() {
        let dir = tempfile::tempdir().unwrap();
        let xlsx = dir.path().join("source.xlsx");
        write_xlsx(&xlsx);
        let xlsb = dir.path().join("BAMDefinition.xlsb");
        write_xlsb_shaped(&xlsx, &xlsb);

        // The renamed part holds XML rather than binary records, so the
        // xlsb reader is attempted and refuses it too
        let err = open_first(&CalamineConnectionFactory, &ACCESS_STRATEGIES, &xlsb)
            .err()
            .unwrap();
        assert!(matches!(err, ExtractionError::BackendUnavailable(_)), "{err}");
        assert!(logs_contain("calamine.xlsx"));
        assert!(logs_contain("calamine.xlsb"));

        let err = extract(&xlsb, ExtractionMode::Direct).unwrap_err();
        assert!(!matches!(err, ExtractionError::DefinitionNotFound(_)), "{err}");
    }

    /// Connection serving a fixed table, or a fixed failure
    struct StubConnection {
        sheet: &'static str,
        result: Result<SheetTable, QueryError>,
    }

    impl StubConnection {
        fn with_rows(rows: Vec<Vec<Option<&str>>>) -> Self {
            let rows = rows
                .into_iter()
                .map(|row| row.into_iter().map(|c| c.map(str::to_string)).collect())
                .collect();
            Self {
                sheet: "BamXmlHiddenSheet",
                result: Ok(SheetTable { rows }),
            }
        }
    }

    impl TabularConnection for StubConnection {
        fn query_sheet(&mut self, sheet: &str) -> Result<SheetTable, QueryError> {
            if sheet != self.sheet {
                return Err(QueryError::SheetNotFound);
            }
            self.result.clone()
        }
    }

    #[test]
    fn test_reads_first_row_until_gap() {
        let mut connection = StubConnection::with_rows(vec![vec![
            Some("<A>"),
            Some("<B/>"),
            Some("</A>"),
            None,
            Some("<ignored/>"),
        ]]);

        let document =
            read_definition(&mut connection, "BamXmlHiddenSheet", CellLayout::Row).unwrap();
        assert_eq!(document, "<A><B/></A>");
    }

    #[test]
    fn test_only_first_row_is_used() {
        let mut connection = StubConnection::with_rows(vec![
            vec![Some("<A/>")],
            vec![Some("<second-row/>")],
        ]);

        let document =
            read_definition(&mut connection, "BamXmlHiddenSheet", CellLayout::Row).unwrap();
        assert_eq!(document, "<A/>");
    }

    #[test]
    fn test_column_layout_reads_down_first_column() {
        let mut connection = StubConnection::with_rows(vec![
            vec![Some("<A>"), Some("side")],
            vec![Some("</A>")],
            vec![None],
            vec![Some("<after-gap/>")],
        ]);

        let document =
            read_definition(&mut connection, "BamXmlHiddenSheet", CellLayout::Column).unwrap();
        assert_eq!(document, "<A></A>");
    }

    #[test]
    fn test_missing_sheet_is_definition_not_found() {
        let mut connection = StubConnection::with_rows(vec![vec![Some("<A/>")]]);

        let err = read_definition(&mut connection, "OtherSheet", CellLayout::Row).unwrap_err();
        assert!(matches!(err, ExtractionError::DefinitionNotFound(ref s) if s == "OtherSheet"));
    }

    #[test]
    fn test_backend_failure_is_backend_error() {
        let mut connection = StubConnection {
            sheet: "BamXmlHiddenSheet",
            result: Err(QueryError::Backend("corrupt shared strings".to_string())),
        };

        let err =
            read_definition(&mut connection, "BamXmlHiddenSheet", CellLayout::Row).unwrap_err();
        assert!(matches!(err, ExtractionError::BackendError(_)));
    }

    #[test]
    fn test_no_rows_is_definition_empty() {
        let mut connection = StubConnection::with_rows(vec![]);

        let err =
            read_definition(&mut connection, "BamXmlHiddenSheet", CellLayout::Row).unwrap_err();
        assert!(matches!(err, ExtractionError::DefinitionEmpty));
    }

    #[test]
    fn test_empty_origin_is_definition_empty() {
        let mut connection = StubConnection::with_rows(vec![vec![None, Some("<A/>")]]);

        let err =
            read_definition(&mut connection, "BamXmlHiddenSheet", CellLayout::Row).unwrap_err();
        assert!(matches!(err, ExtractionError::DefinitionEmpty));
    }

    #[test]
    fn test_open_fails_for_non_workbook_file() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        std::fs::write(file.path(), b"not a workbook").unwrap();

        let result = CalamineConnectionFactory.attempt_open(
            &crate::extraction::strategy::ACCESS_STRATEGIES[0],
            file.path(),
        );
        assert!(result.is_err());
    }
}
