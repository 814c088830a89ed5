//! Resolver output lines and the two discrepancy record shapes.

use std::fmt;

use chrono::NaiveDate;

use crate::ids::{Identifier, LineKey, column_letter};
use crate::sheet::CellValue;

/// One resolved score line: its identity plus the physical worksheet row the
/// data cells sit on.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DataLine {
    pub key: LineKey,
    pub row: u32,
}

impl DataLine {
    pub fn new(identifier: impl Into<Identifier>, test_no: u32, row: u32) -> Self {
        Self {
            key: LineKey::new(identifier, test_no),
            row,
        }
    }

    pub fn identifier(&self) -> &Identifier {
        &self.key.identifier
    }

    pub fn test_no(&self) -> u32 {
        self.key.test_no
    }
}

/// A nonblank scalar extracted from a data cell.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl Value {
    /// Lift a cell value, dropping empties.
    pub fn from_cell(cell: &CellValue) -> Option<Value> {
        match cell {
            CellValue::Empty => None,
            CellValue::Number(n) => Some(Value::Number(*n)),
            CellValue::Text(s) => Some(Value::Text(s.clone())),
            CellValue::Date(d) => Some(Value::Date(*d)),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// An identifier found in the worksheet but absent from the LUT.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct NewLine {
    pub identifier: Identifier,
    pub test_no: u32,
    pub row: u32,
}

impl NewLine {
    pub fn from_line(line: &DataLine) -> Self {
        Self {
            identifier: line.key.identifier.clone(),
            test_no: line.key.test_no,
            row: line.row,
        }
    }
}

/// A LUT-recognized line whose column slot has no destination variable yet
/// carries a nonblank value. Surfaced so the LUT can be extended instead of
/// silently dropping data.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MissingLine {
    pub identifier: Identifier,
    pub test_no: u32,
    pub row: u32,
    /// 1-based physical column of the offending cell.
    pub col: u32,
    /// Column semantic name from the department's slot order.
    pub name: String,
    pub value: Value,
}

impl MissingLine {
    /// The offending cell's column in letter form, for operator diagnosis.
    pub fn col_letter(&self) -> String {
        column_letter(self.col)
    }
}
