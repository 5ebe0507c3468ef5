//! Reading import files from disk with size and encoding checks.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{IngestError, Result};

/// Default maximum import file size (10 MiB).
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

const UTF8_BOM: &str = "\u{feff}";

/// Options for [`read_import_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    pub max_file_bytes: u64,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

/// Text content of a selected import file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSource {
    /// File name without directories, recorded in the import history.
    pub filename: String,
    /// UTF-8 content with any byte-order mark removed.
    pub content: String,
    /// SHA-256 of the raw file bytes (lowercase hex).
    pub sha256: String,
}

impl ImportSource {
    /// Build a source from in-memory text.
    pub fn from_text(filename: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let sha256 = sha256_hex(content.as_bytes());
        let content = match content.strip_prefix(UTF8_BOM) {
            Some(rest) => rest.to_string(),
            None => content,
        };
        Self {
            filename: filename.into(),
            content,
            sha256,
        }
    }
}

/// Read an import file after checking its extension, size and encoding.
///
/// Any failure leaves nothing behind; the caller gets either the whole
/// content or an error.
pub fn read_import_file(path: &Path, options: &ReadOptions) -> Result<ImportSource> {
    check_extension(path)?;
    check_file_size_with_limit(path, options.max_file_bytes)?;

    let mut file = File::open(path).map_err(|e| open_error(path, e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(|e| IngestError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate_encoding(path, &bytes)?;

    let sha256 = sha256_hex(&bytes);
    let content = String::from_utf8(bytes).map_err(|_| IngestError::InvalidUtf8 {
        path: path.to_path_buf(),
    })?;
    let content = match content.strip_prefix(UTF8_BOM) {
        Some(rest) => rest.to_string(),
        None => content,
    };

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    info!(file = %filename, bytes = content.len(), "read import file");

    Ok(ImportSource {
        filename,
        content,
        sha256,
    })
}

/// Reject anything that is not a `.csv` file (case-insensitive).
pub fn check_extension(path: &Path) -> Result<()> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(IngestError::UnsupportedExtension {
            path: path.to_path_buf(),
        })
    }
}

/// Check file size against a limit before reading.
pub fn check_file_size_with_limit(path: &Path, max_size: u64) -> Result<()> {
    let metadata = std::fs::metadata(path).map_err(|e| open_error(path, e))?;

    if metadata.len() > max_size {
        return Err(IngestError::FileTooLarge {
            path: path.to_path_buf(),
            size: metadata.len(),
            max_size,
        });
    }

    Ok(())
}

/// Reject UTF-16 byte-order marks. A UTF-8 BOM is accepted.
fn validate_encoding(path: &Path, bytes: &[u8]) -> Result<()> {
    if bytes.len() >= 2 {
        // UTF-16 LE BOM
        if bytes[0..2] == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        // UTF-16 BE BOM
        if bytes[0..2] == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

fn open_error(path: &Path, e: std::io::Error) -> IngestError {
    if e.kind() == std::io::ErrorKind::NotFound {
        IngestError::FileNotFound {
            path: path.to_path_buf(),
        }
    } else {
        IngestError::Read {
            path: path.to_path_buf(),
            source: e,
        }
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let hash = hex::encode(hasher.finalize());
    debug!(sha256 = %hash, "hashed import content");
    hash
}
