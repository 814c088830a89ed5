//! Error types for lookup-table and reference-table loading.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LutError {
    /// Failed to open or read the source file.
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed delimited content.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A required column is absent from the header row.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },

    /// A field that must be numeric could not be parsed.
    #[error("invalid {field} value '{value}' in {path}")]
    InvalidField {
        field: &'static str,
        value: String,
        path: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, LutError>;
