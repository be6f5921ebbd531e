//! Source context for managing fragment files

use crate::types::FileId;
use serde::{Deserialize, Serialize};

/// Context for managing source files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceContext {
    files: Vec<SourceFile>,
}

/// A source file with content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    /// File path or identifier
    pub path: String,
    /// File content.
    ///
    /// When None, content is read from disk on demand using the path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl SourceContext {
    /// Create a new empty source context
    pub fn new() -> Self {
        SourceContext { files: Vec::new() }
    }

    /// Add a file to the context and return its ID.
    ///
    /// When `content` is None the file is read from disk immediately; a
    /// missing file is kept with no content so its path can still be shown.
    pub fn add_file(&mut self, path: String, content: Option<String>) -> FileId {
        let id = FileId(self.files.len());
        let content = content.or_else(|| std::fs::read_to_string(&path).ok());
        self.files.push(SourceFile { path, content });
        id
    }

    /// Get a file by ID
    pub fn get_file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0)
    }

    /// Number of registered files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// True when no file has been registered
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
