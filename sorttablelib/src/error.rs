//! Error types for sorttablelib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading documents or preparing tables
#[derive(Error, Debug)]
pub enum SortTableError {
    /// A header cell names a comparator that is not registered
    #[error("unknown sort type '{name}' on column {column}")]
    UnknownSortType { column: usize, name: String },

    /// Table selector could not be parsed
    #[error("invalid table selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    /// Node tree is structurally invalid (e.g. a text node at the root)
    #[error("invalid document: {0}")]
    InvalidDocument(String),

    /// Failed to read a document or config file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
