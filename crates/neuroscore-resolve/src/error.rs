use thiserror::Error;

/// Structural failures while walking a worksheet. Any of these aborts the
/// current worksheet; the caller decides whether to continue a batch.
#[derive(Debug, Error)]
pub enum StructureError {
    /// The `Raw` header sentinel was never found in its column.
    #[error("no 'Raw' sentinel found in column {sentinel_col}")]
    SentinelNotFound { sentinel_col: u32 },

    /// No nonblank label cell below the sentinel row.
    #[error("no data row found in label column {label_col} after row {sentinel_row}")]
    FirstDataRowNotFound { label_col: u32, sentinel_row: u32 },

    /// The seed row's label cell is not text.
    #[error("seed row {row} has no text label")]
    MissingSeedLabel { row: u32 },

    /// A dedent asked for more context than the label stack holds.
    #[error("dedent at row {row} underflows the label stack")]
    DedentUnderflow { row: u32 },
}

pub type Result<T> = std::result::Result<T, StructureError>;
