//! Source file access
//!
//! Every SQL file the reader looks at goes through a [`SourceReader`], so the
//! fold/analyze pipeline can run against the real file system or against an
//! in-memory set of files in tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;

/// Read access to SQL source files.
pub trait SourceReader: Send + Sync {
    /// Return the full text of the file at `path`.
    fn read_source(&self, path: &Path) -> std::io::Result<String>;
}

/// Reads files from disk, accepting UTF-8 (with or without BOM) and Windows-1252.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSourceReader;

impl SourceReader for FsSourceReader {
    fn read_source(&self, path: &Path) -> std::io::Result<String> {
        let content = read_file_with_encoding_fallback(path)?;
        Ok(match content.strip_prefix('\u{FEFF}') {
            Some(stripped) => stripped.to_string(),
            None => content,
        })
    }
}

/// Read a file as a string, trying UTF-8 first, then Windows-1252 as fallback
fn read_file_with_encoding_fallback(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(err) => {
            let bytes = err.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    "File contains invalid characters",
                ))
            } else {
                Ok(decoded.into_owned())
            }
        }
    }
}

/// In-memory file set keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceReader {
    files: HashMap<PathBuf, String>,
}

impl MemorySourceReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }
}

impl SourceReader for MemorySourceReader {
    fn read_source(&self, path: &Path) -> std::io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            )
        })
    }
}
