//! Cell value to text conversion shared by the calamine-backed readers

use calamine::Data;

use crate::extraction::Locale;

/// Text of a cell, or `None` for an empty cell.
///
/// Error cells (`#N/A`, `#REF!`) count as empty. Numbers are rendered with
/// the locale's decimal separator; date cells yield their serial value.
pub fn cell_text(data: &Data, locale: &Locale) -> Option<String> {
    match data {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(locale.format_number(*f)),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(dt) => Some(locale.format_number(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}
