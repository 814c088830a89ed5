//! Worksheet accessor: the 2D cell grid the resolver and extractor read.
//!
//! The file-format backend (xlsx, exported text, ...) lives outside this
//! workspace; callers materialize whatever they opened into a [`GridSheet`]
//! or implement [`Worksheet`] over their own storage.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

/// A cell's typed content.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Date(NaiveDate),
}

impl CellValue {
    /// The textual content, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// True for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// One worksheet cell: its value plus the alignment indent unit attached to
/// its text style. The indent is the raw unit from the file, not a resolved
/// hierarchy rank.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Cell {
    pub value: CellValue,
    pub indent: u32,
}

impl Cell {
    pub const EMPTY: Cell = Cell {
        value: CellValue::Empty,
        indent: 0,
    };

    pub fn text(value: impl Into<String>) -> Self {
        Cell {
            value: CellValue::Text(value.into()),
            indent: 0,
        }
    }

    pub fn number(value: f64) -> Self {
        Cell {
            value: CellValue::Number(value),
            indent: 0,
        }
    }

    pub fn date(value: NaiveDate) -> Self {
        Cell {
            value: CellValue::Date(value),
            indent: 0,
        }
    }

    pub fn with_indent(mut self, indent: u32) -> Self {
        self.indent = indent;
        self
    }
}

/// Random-access read view of a worksheet. Rows and columns are 1-based,
/// matching physical spreadsheet addressing.
pub trait Worksheet {
    /// The cell at (row, col); out-of-range reads return an empty cell.
    fn cell(&self, row: u32, col: u32) -> &Cell;

    /// Last populated row.
    fn max_row(&self) -> u32;

    /// Last populated column.
    fn max_col(&self) -> u32;

    /// Whether the row is hidden in the sheet's row-visibility metadata.
    fn row_hidden(&self, row: u32) -> bool;
}

/// In-memory sparse worksheet.
#[derive(Debug, Clone, Default)]
pub struct GridSheet {
    cells: HashMap<(u32, u32), Cell>,
    hidden_rows: HashSet<u32>,
    max_row: u32,
    max_col: u32,
}

impl GridSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, row: u32, col: u32, cell: Cell) {
        self.max_row = self.max_row.max(row);
        self.max_col = self.max_col.max(col);
        self.cells.insert((row, col), cell);
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, row: u32, col: u32, cell: Cell) -> Self {
        self.set(row, col, cell);
        self
    }

    pub fn hide_row(&mut self, row: u32) {
        self.hidden_rows.insert(row);
    }

    #[must_use]
    pub fn with_hidden_row(mut self, row: u32) -> Self {
        self.hide_row(row);
        self
    }
}

impl Worksheet for GridSheet {
    fn cell(&self, row: u32, col: u32) -> &Cell {
        self.cells.get(&(row, col)).unwrap_or(&Cell::EMPTY)
    }

    fn max_row(&self) -> u32 {
        self.max_row
    }

    fn max_col(&self) -> u32 {
        self.max_col
    }

    fn row_hidden(&self, row: u32) -> bool {
        self.hidden_rows.contains(&row)
    }
}
