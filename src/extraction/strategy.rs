//! Backend selection for direct extraction.
//!
//! Strategies are tried in a fixed order and the first one that opens the
//! workbook wins. A failed attempt is logged at debug level and otherwise
//! swallowed; only exhaustion of the whole list is reported.

use std::fmt;
use std::path::Path;

use tracing::{debug, info};

use crate::extraction::ExtractionError;

/// Workbook reader behind a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Zip-based Office Open XML workbook
    Xlsx,
    /// Zip-based binary workbook
    Xlsb,
    /// Legacy BIFF workbook
    Xls,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Xlsx => "calamine.xlsx",
            Self::Xlsb => "calamine.xlsb",
            Self::Xls => "calamine.xls",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate backend configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessStrategy {
    pub provider: Provider,
    /// Workbook format version the provider understands
    pub capability: &'static str,
    /// Only attempted when the file has this extension (case-insensitive)
    pub required_extension: Option<&'static str>,
}

impl AccessStrategy {
    /// Whether this strategy should be attempted for `path`
    pub fn applies_to(&self, path: &Path) -> bool {
        match self.required_extension {
            None => true,
            Some(required) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(required)),
        }
    }
}

impl fmt::Display for AccessStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.provider, self.capability)
    }
}

/// Candidate strategies, newest format first
pub const ACCESS_STRATEGIES: [AccessStrategy; 3] = [
    AccessStrategy {
        provider: Provider::Xlsx,
        capability: "Excel 12.0",
        required_extension: None,
    },
    AccessStrategy {
        provider: Provider::Xlsb,
        capability: "Excel 14.0",
        required_extension: None,
    },
    AccessStrategy {
        provider: Provider::Xls,
        capability: "Excel 8.0",
        required_extension: Some("xls"),
    },
];

/// Opens a connection for a single strategy
pub trait ConnectionFactory {
    type Connection;

    /// Try to open `path` with `strategy`; the error is a diagnostic only
    fn attempt_open(&self, strategy: &AccessStrategy, path: &Path)
    -> Result<Self::Connection, String>;
}

/// Open `path` with the first strategy that succeeds
pub fn open_first<'s, F: ConnectionFactory>(
    factory: &F,
    strategies: &'s [AccessStrategy],
    path: &Path,
) -> Result<(F::Connection, &'s AccessStrategy), ExtractionError> {
    for strategy in strategies {
        if !strategy.applies_to(path) {
            debug!(%strategy, "Skipping strategy, extension does not match");
            continue;
        }

        match factory.attempt_open(strategy, path) {
            Ok(connection) => {
                info!(%strategy, path = %path.display(), "Opened workbook");
                return Ok((connection, strategy));
            }
            Err(reason) => {
                debug!(%strategy, %reason, "Strategy could not open workbook");
            }
        }
    }

    Err(ExtractionError::BackendUnavailable(
        "Export requires an Office Open XML workbook (.xlsx, .xlsm), a binary workbook (.xlsb), or an Excel 97-2003 workbook (.xls)."
            .to_string(),
    ))
}
