//! Template text selection: the built-in template embedded in the binary,
//! or a caller-supplied file. The two are never mixed.

use std::path::{Path, PathBuf};

use rust_embed::RustEmbed;
use tracing::{debug, warn};

use crate::generation::GenerationError;

/// File name of the built-in template inside `templates/`
pub const DEFAULT_TEMPLATE_NAME: &str = "TypedApi.cs.tera";

/// Templates embedded at compile time
#[derive(RustEmbed)]
#[folder = "templates/"]
struct EmbeddedTemplates;

/// Where the template text comes from
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TemplateSource {
    /// The typed C# API template shipped with the tool
    #[default]
    Builtin,
    /// A template file chosen by the caller
    File(PathBuf),
}

impl TemplateSource {
    /// `File(path)` if a path is given, otherwise `Builtin`
    pub fn from_override(path: Option<&Path>) -> Self {
        match path {
            Some(path) => Self::File(path.to_path_buf()),
            None => Self::Builtin,
        }
    }

    /// Load the template text
    pub fn load(&self) -> Result<String, GenerationError> {
        match self {
            Self::Builtin => default_template_text(),
            Self::File(path) => {
                let bytes = std::fs::read(path).map_err(|e| {
                    warn!(path = %path.display(), error = %e, "Cannot read custom template");
                    GenerationError::TemplateNotFound(path.clone())
                })?;
                debug!(path = %path.display(), bytes = bytes.len(), "Loaded custom template");
                Ok(decode_text(&bytes))
            }
        }
    }
}

/// Text of the built-in template
pub fn default_template_text() -> Result<String, GenerationError> {
    let file = EmbeddedTemplates::get(DEFAULT_TEMPLATE_NAME)
        .ok_or_else(|| GenerationError::TemplateNotFound(PathBuf::from(DEFAULT_TEMPLATE_NAME)))?;
    Ok(decode_text(&file.data))
}

/// Decode template bytes, honoring a UTF-8 or UTF-16 byte-order mark.
/// Without a BOM the text is taken as UTF-8.
pub fn decode_text(bytes: &[u8]) -> String {
    let (encoding, bom_length) =
        encoding_rs::Encoding::for_bom(bytes).unwrap_or((encoding_rs::UTF_8, 0));
    let (text, _had_errors) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
    text.into_owned()
}
