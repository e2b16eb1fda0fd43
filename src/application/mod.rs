//! Application layer - runs the export and generate use cases end to end

pub mod commands;

pub use commands::*;

use std::path::Path;

use tracing::info;

use crate::core::error::Result;
use crate::extraction::{ExtractionMode, Extractor};
use crate::generation::{Generator, TemplateSource, decode_text, default_template_text};
use crate::output::{TextEncoding, write_text};

/// Extract the definition and write it as UTF-16 text
pub fn export_definition(request: &ExportRequest) -> Result<ExportResponse> {
    let extractor = Extractor::new(request.options.clone());
    let definition = extractor.extract(&request.workbook, request.mode)?;

    write_text(&request.output, &definition, TextEncoding::Utf16LeBom)?;
    info!(output = %request.output.display(), "Wrote BAM XML");

    Ok(ExportResponse {
        output: request.output.clone(),
        characters: definition.chars().count(),
    })
}

/// Produce the definition, generate code from it and write it as UTF-8
pub fn generate_api(request: &GenerateRequest) -> Result<GenerateResponse> {
    let definition = match &request.input {
        DefinitionInput::Workbook(path) => {
            Extractor::new(request.options.clone()).extract(path, ExtractionMode::Direct)?
        }
        DefinitionInput::Xml(path) => read_definition_file(path)?,
    };

    let source = TemplateSource::from_override(request.template.as_deref());
    let code = Generator::new().generate(
        &definition,
        &request.mode,
        &request.namespace,
        &source,
    )?;

    write_text(&request.output, &code, TextEncoding::Utf8)?;
    info!(output = %request.output.display(), "Wrote typed BAM API");

    Ok(GenerateResponse {
        output: request.output.clone(),
        bytes: code.len(),
    })
}

/// Write the built-in template to `path` as a starting point for a custom one
pub fn export_template(path: &Path) -> Result<()> {
    let text = default_template_text()?;
    write_text(path, &text, TextEncoding::Utf8)?;
    info!(path = %path.display(), "Exported built-in template");
    Ok(())
}

fn read_definition_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(decode_text(&bytes))
}
