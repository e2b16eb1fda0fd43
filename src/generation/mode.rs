//! Event-stream modes the generated API can target

use std::fmt;
use std::str::FromStr;

use crate::generation::GenerationError;

/// Which BAM event stream the generated API writes through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventStreamMode {
    /// Synchronous writes straight to the BAM primary import database
    Direct,
    /// Buffered writes through the message box
    Buffered,
    /// Writes enlisted in an orchestration's transaction
    Orchestration,
}

impl EventStreamMode {
    /// Canonical capitalized name, as bound into templates
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "Direct",
            Self::Buffered => "Buffered",
            Self::Orchestration => "Orchestration",
        }
    }

    pub fn all() -> [Self; 3] {
        [Self::Direct, Self::Buffered, Self::Orchestration]
    }
}

impl FromStr for EventStreamMode {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "direct" => Ok(Self::Direct),
            "buffered" => Ok(Self::Buffered),
            "orchestration" => Ok(Self::Orchestration),
            _ => Err(GenerationError::InvalidMode(s.to_string())),
        }
    }
}

impl fmt::Display for EventStreamMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
