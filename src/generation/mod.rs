//! Template-driven code generation.
//!
//! Turns a BAM definition into source code by running a template with the
//! definition tree and a fixed set of parameters bound. The steps run in a
//! fixed order and the first failure ends the run:
//!
//! 1. load the template text (built-in or caller file),
//! 2. validate the event-stream mode,
//! 3. compile the template,
//! 4. parse the definition,
//! 5. bind parameters and render.

pub mod document;
pub mod errors;
pub mod mode;
pub mod parameters;
pub mod source;
pub mod tera_engine;
pub mod traits;

pub use document::*;
pub use errors::*;
pub use mode::*;
pub use parameters::TemplateParameters;
pub use source::*;
pub use tera_engine::*;
pub use traits::*;

use std::path::Path;

use tracing::{debug, info};

/// Generate source text with the Tera engine
pub fn generate(
    definition_xml: &str,
    mode: &str,
    namespace: &str,
    template_override: Option<&Path>,
) -> Result<String, GenerationError> {
    Generator::new().generate(
        definition_xml,
        mode,
        namespace,
        &TemplateSource::from_override(template_override),
    )
}

/// Code generator over a pluggable template engine
#[derive(Debug, Default, Clone)]
pub struct Generator<E: TemplateEngine = TeraEngine> {
    engine: E,
}

impl Generator<TeraEngine> {
    pub fn new() -> Self {
        Self::with_engine(TeraEngine::new())
    }
}

impl<E: TemplateEngine> Generator<E> {
    pub fn with_engine(engine: E) -> Self {
        Self { engine }
    }

    /// Render `definition_xml` through the template from `source`
    pub fn generate(
        &self,
        definition_xml: &str,
        mode: &str,
        namespace: &str,
        source: &TemplateSource,
    ) -> Result<String, GenerationError> {
        let template_text = source.load()?;
        let mode: EventStreamMode = mode.parse()?;

        let program = self.engine.compile(&template_text)?;
        let document = DefinitionDocument::parse(definition_xml)?;
        debug!(root = %document.root().name, "Parsed BAM definition");

        let parameters = TemplateParameters::new(mode, namespace);
        let output = program.render(&document, &parameters)?;

        info!(
            %mode,
            namespace,
            template = ?source,
            length = output.len(),
            "Generated typed BAM API"
        );
        Ok(output)
    }
}
