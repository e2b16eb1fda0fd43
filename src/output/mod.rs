//! Filesystem output for exported definitions and generated code

use std::fs;
use std::io::Write;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDirectory {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file {}: {source}", .path.display())]
    Write {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// On-disk text encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// UTF-8 without a byte-order mark
    Utf8,
    /// UTF-16 little endian with a byte-order mark
    Utf16LeBom,
}

impl TextEncoding {
    pub fn encode(self, content: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => content.as_bytes().to_vec(),
            Self::Utf16LeBom => {
                let mut bytes = Vec::with_capacity(2 + content.len() * 2);
                bytes.extend_from_slice(&[0xFF, 0xFE]);
                bytes.extend(content.encode_utf16().flat_map(u16::to_le_bytes));
                bytes
            }
        }
    }
}

/// Write `content` to `path`, creating parent directories as needed
pub fn write_text(path: &Path, content: &str, encoding: TextEncoding) -> Result<(), OutputError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let bytes = encoding.encode(content);
    let write_error = |source| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };
    let mut file = fs::File::create(path).map_err(write_error)?;
    file.write_all(&bytes).map_err(write_error)?;
    file.flush().map_err(write_error)?;

    debug!(path = %path.display(), bytes = bytes.len(), ?encoding, "Wrote output file");
    Ok(())
}
