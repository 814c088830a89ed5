use thiserror::Error;

use neuroscore_resolve::StructureError;

/// Errors raised while extracting a worksheet. Structural failures come
/// from the resolver; classification failures carry the offending cell for
/// operator diagnosis.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Structure(#[from] StructureError),

    /// Timepoints are 1-based; 0 addresses no column block.
    #[error("timepoint must be 1 or greater")]
    InvalidTimepoint,

    /// A score value matched no known scale band.
    #[error("cannot classify score value '{value}' at row {row}, column {col}")]
    Classification { row: u32, col: u32, value: String },

    /// A fixed header cell did not hold what the template promises.
    #[error("malformed header field at row {row}, column {col}: {reason}")]
    Header { row: u32, col: u32, reason: String },
}

pub type Result<T> = std::result::Result<T, ExtractError>;
