//! Structured error types for the folio table engine.
//!
//! Three variants cover the real error sources: resolving a field path
//! against a record, parsing JSON input, and loading fonts.

use thiserror::Error;

/// The unified error type returned by all public folio API functions.
#[derive(Debug, Error)]
pub enum TableError {
    /// A dot-path could not be resolved against a record. Not recoverable:
    /// the render pass stops and no partial row is emitted.
    #[error("Cannot resolve key `{path}`: {reason}")]
    KeyResolution { path: String, reason: String },

    /// JSON input failed to parse as table options or records.
    #[error("Failed to parse table input: {source}{}", hint_suffix(.hint))]
    Parse {
        #[source]
        source: serde_json::Error,
        hint: String,
    },

    /// A font could not be loaded or parsed.
    #[error("Font error: {0}")]
    Font(String),
}

fn hint_suffix(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl TableError {
    pub(crate) fn key(path: &str, reason: impl Into<String>) -> Self {
        TableError::KeyResolution {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for TableError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the expected shape. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input, is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        TableError::Parse { source: e, hint }
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TableError>;
