use thiserror::Error;

/// Errors raised while constructing model values.
#[derive(Debug, Error)]
pub enum ModelError {
    /// A department string not present in the known catalog.
    #[error("unknown department: {0}")]
    UnknownDepartment(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
