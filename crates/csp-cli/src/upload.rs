//! Input validation
//!
//! The engine accepts any text; rejecting things that are not HTML documents
//! is the caller's job and happens here, before a run starts.

use std::fs;
use std::path::Path;

use anyhow::Context;

/// Reasons an input is refused
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please select a file to upload.")]
    Empty,

    #[error("Please upload a valid .html file.")]
    NotHtml,
}

/// A validated HTML input
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub size: u64,
    pub content: String,
}

impl Upload {
    /// Validate raw bytes; invalid UTF-8 is replaced rather than rejected
    pub fn from_bytes(filename: &str, bytes: &[u8]) -> Result<Self, UploadError> {
        if bytes.is_empty() {
            return Err(UploadError::Empty);
        }
        if !is_html_name(filename) {
            return Err(UploadError::NotHtml);
        }

        Ok(Self {
            filename: filename.to_string(),
            size: bytes.len() as u64,
            content: String::from_utf8_lossy(bytes).into_owned(),
        })
    }

    /// Read and validate a file from disk
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        Ok(Self::from_bytes(filename, &bytes)?)
    }
}

fn is_html_name(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    lower.ends_with(".html") || lower.ends_with(".htm")
}
