//! Core data model for neuroscore score-sheet extraction: line identities,
//! department column policies, the worksheet accessor trait, and the
//! discrepancy record shapes shared across the workspace.

pub mod department;
pub mod error;
pub mod ids;
pub mod line;
pub mod sheet;

pub use department::{ColumnSlot, Department, PhysicalColumn, SheetLayout};
pub use error::{ModelError, Result};
pub use ids::{Identifier, LineKey, PATH_SEPARATOR, column_letter};
pub use line::{DataLine, MissingLine, NewLine, Value};
pub use sheet::{Cell, CellValue, GridSheet, Worksheet};
