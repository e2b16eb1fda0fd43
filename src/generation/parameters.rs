//! The closed set of values bound into every template.
//!
//! Parameter names are a contract with existing custom templates and must
//! not change: `EventStreamType`, `TargetNamespace`, `ToolVersion`.

use crate::generation::EventStreamMode;

pub const EVENT_STREAM_TYPE: &str = "EventStreamType";
pub const TARGET_NAMESPACE: &str = "TargetNamespace";
pub const TOOL_VERSION: &str = "ToolVersion";

/// `major.minor.patch` of this tool, bound as `ToolVersion`
pub const TOOL_VERSION_VALUE: &str = concat!(
    env!("CARGO_PKG_VERSION_MAJOR"),
    ".",
    env!("CARGO_PKG_VERSION_MINOR"),
    ".",
    env!("CARGO_PKG_VERSION_PATCH")
);

/// Values bound into the template before rendering.
///
/// Every field is required, so a value of this type is always a complete
/// binding set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParameters {
    pub event_stream_type: EventStreamMode,
    /// Passed through untouched; identifier legality is the template's job
    pub target_namespace: String,
    pub tool_version: String,
}

impl TemplateParameters {
    pub fn new<S: Into<String>>(mode: EventStreamMode, target_namespace: S) -> Self {
        Self {
            event_stream_type: mode,
            target_namespace: target_namespace.into(),
            tool_version: TOOL_VERSION_VALUE.to_string(),
        }
    }

    /// `(name, value)` pairs in binding order
    pub fn bindings(&self) -> [(&'static str, &str); 3] {
        [
            (EVENT_STREAM_TYPE, self.event_stream_type.as_str()),
            (TARGET_NAMESPACE, &self.target_namespace),
            (TOOL_VERSION, &self.tool_version),
        ]
    }
}
