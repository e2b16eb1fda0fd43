//! Reassembly of the definition from consecutive cells.
//!
//! Both extraction modes feed their cells through [`reconstruct`], so the
//! termination rule lives in exactly one place: the document ends at the
//! first missing or zero-length cell, even if later cells hold data.

use serde::Deserialize;
use tracing::debug;

/// Direction in which the fragments run from the origin cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellLayout {
    /// Along the first row: A1, B1, C1, ...
    #[default]
    Row,
    /// Down the first column: A1, A2, A3, ...
    Column,
}

impl CellLayout {
    /// `(row, column)` of the `index`-th fragment, counting addresses from `base`
    pub fn address(self, index: u32, base: u32) -> (u32, u32) {
        match self {
            Self::Row => (base, base + index),
            Self::Column => (base + index, base),
        }
    }
}

/// Concatenate cell fragments in order, stopping at the first gap.
///
/// Cells are pulled lazily, so an unbounded source (an application walking
/// cells one at a time) is read only up to the gap. Errors from the source
/// abort reconstruction.
pub fn reconstruct<I, E>(cells: I) -> Result<String, E>
where
    I: IntoIterator<Item = Result<Option<String>, E>>,
{
    let mut document = String::new();
    let mut fragments = 0usize;

    for cell in cells {
        match cell? {
            Some(fragment) if !fragment.is_empty() => {
                document.push_str(&fragment);
                fragments += 1;
            }
            _ => break,
        }
    }

    debug!(fragments, length = document.len(), "Reassembled definition");
    Ok(document)
}
