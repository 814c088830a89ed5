//! Hierarchical line-identifier resolution for neuroscore score sheets.
//!
//! Converts the free-text, visually-indented label column of a workbook
//! into an ordered sequence of fully-qualified line identities that the
//! extraction layer joins against a lookup table.

pub mod error;
pub mod resolver;

pub use error::{Result, StructureError};
pub use resolver::{filter_unhidden, find_first_data_row, resolve, resolve_from, resolve_unhidden};
