//! Port interfaces for the generation domain

use crate::generation::{DefinitionDocument, GenerationError, TemplateParameters};

/// Compiles template text into a reusable program
pub trait TemplateEngine {
    type Program: CompiledTemplate;

    /// Compile template text, reporting syntax errors as
    /// [`GenerationError::TemplateCompileError`]
    fn compile(&self, template_text: &str) -> Result<Self::Program, GenerationError>;
}

/// A compiled template that renders a definition with bound parameters
pub trait CompiledTemplate {
    /// Render the whole output or fail with
    /// [`GenerationError::TransformError`]; there is no partial output
    fn render(
        &self,
        document: &DefinitionDocument,
        parameters: &TemplateParameters,
    ) -> Result<String, GenerationError>;
}
