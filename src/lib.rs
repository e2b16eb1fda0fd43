//! bamgen
//!
//! Pulls the BAM definition XML out of the hidden sheet of an Excel BAM
//! definition workbook and turns it into a typed event-stream API through a
//! template.
//!
//! ```no_run
//! use bamgen::extraction::{ExtractionMode, extract};
//! use bamgen::generation::generate;
//! use std::path::Path;
//!
//! let xml = extract(Path::new("BAMDefinition.xlsx"), ExtractionMode::Direct)?;
//! let code = generate(&xml, "buffered", "Contoso.Bam", None)?;
//! # Ok::<(), bamgen::core::Error>(())
//! ```
#![deny(unsafe_code)]

pub mod application;
pub mod core;
pub mod extraction;
pub mod generation;
pub mod output;
