use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// File name for local documents, the URL for web pages
    pub source: String,
    pub content: String,
}

impl ExtractedRecord {
    pub fn new(source: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            content: content.into(),
        }
    }

    /// Build a record only when extraction produced text.
    pub fn non_empty(source: impl Into<String>, content: String) -> Option<Self> {
        if content.is_empty() {
            None
        } else {
            Some(Self::new(source, content))
        }
    }
}
