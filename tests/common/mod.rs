//! Workbook fixtures shared by the integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use tempfile::TempDir;

pub const HIDDEN_SHEET: &str = "BamXmlHiddenSheet";

pub const SHIPMENT_DEFINITION: &str = concat!(
    r#"<BAMDefinition xmlns="http://schemas.microsoft.com/BizTalkServer/2004/10/BAM">"#,
    r#"<Activity Name="Shipment" ID="ID1">"#,
    r#"<Checkpoint Name="ShipmentId" ID="ID2" DataType="NVARCHAR" DataLength="50"/>"#,
    r#"<Checkpoint Name="Shipped" ID="ID3" DataType="DATETIME"/>"#,
    r#"<Checkpoint Name="Weight" ID="ID4" DataType="FLOAT"/>"#,
    r#"</Activity>"#,
    r#"</BAMDefinition>"#
);

/// Write a workbook with a visible first sheet and the definition fragments
/// in row 1 of the hidden sheet
pub fn definition_workbook(dir: &TempDir, name: &str, fragments: &[&str]) -> PathBuf {
    let path = dir.path().join(name);
    write_workbook(&path, Some(fragments));
    path
}

/// Write a workbook that has no definition sheet at all
pub fn plain_workbook(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    write_workbook(&path, None);
    path
}

fn write_workbook(path: &Path, fragments: Option<&[&str]>) {
    let mut workbook = Workbook::new();

    let visible = workbook.add_worksheet();
    visible.set_name("Definition").unwrap();
    visible.write_string(0, 0, "Activity").unwrap();
    visible.write_string(0, 1, "Shipment").unwrap();

    if let Some(fragments) = fragments {
        let hidden = workbook.add_worksheet();
        hidden.set_name(HIDDEN_SHEET).unwrap();
        for (column, fragment) in fragments.iter().enumerate() {
            if !fragment.is_empty() {
                hidden.write_string(0, column as u16, *fragment).unwrap();
            }
        }
        hidden.set_hidden(true);
    }

    workbook.save(path).unwrap();
}

/// Split `text` into cell-sized fragments
pub fn split_into_cells(text: &str, cell_size: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(cell_size)
        .map(|chunk| chunk.iter().collect())
        .collect()
}
