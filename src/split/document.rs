//! Source document loading and final write-back

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::split::error::SplitError;

/// The file being refactored: its path and full text.
///
/// The text is read once at the start of a run and stays read-only until
/// the final commit, which writes the rewritten text back over the
/// original file through a temporary file and an atomic rename.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    path: PathBuf,
    text: String,
}

impl SourceDocument {
    /// Read the document from disk.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SplitError> {
        let path = path.into();
        let text = fs::read_to_string(&path).map_err(|e| SplitError::io(&path, e))?;
        Ok(Self { path, text })
    }

    /// Build a document from an in-memory string, for tests and dry runs.
    pub fn from_string(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte length of the current text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the file on disk with `new_text`. This is the only write
    /// the pipeline performs against the source document.
    pub fn commit(&self, new_text: &str) -> Result<(), SplitError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| SplitError::io(&self.path, e))?;
        tmp.write_all(new_text.as_bytes())
            .map_err(|e| SplitError::io(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| SplitError::io(&self.path, e.error))?;
        Ok(())
    }
}
