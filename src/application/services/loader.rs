//! Tree document loading
//!
//! Reads `{ "rows": [...] }` documents in JSON or TOML and validates them
//! into a [`Tree`].

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::Tree;
use crate::infrastructure::traits::FileSystem;

/// Supported tree document formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> ApplicationResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            _ => Err(ApplicationError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Service for reading tree documents from disk.
pub struct TreeLoader {
    fs: Arc<dyn FileSystem>,
}

impl TreeLoader {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    pub fn load(&self, path: &Path) -> ApplicationResult<Tree> {
        debug!("load: path={}", path.display());
        let format = DocumentFormat::from_path(path)?;
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read tree document", path)?;
        let tree = parse_document(&content, format).map_err(|message| {
            ApplicationError::InvalidDocument {
                path: path.to_path_buf(),
                message,
            }
        })?;
        debug!("load: {} line items", tree.len());
        Ok(tree)
    }
}

/// Parse document text. Structural validation errors surface as messages too.
pub fn parse_document(content: &str, format: DocumentFormat) -> Result<Tree, String> {
    match format {
        DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
    }
}
