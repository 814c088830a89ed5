//! Absent-value normalization.
//!
//! Score sheets are full of placeholder text: spreadsheet error markers,
//! template captions left behind by data entry, leaked formula fragments.
//! Each department has its own denylist of literal tokens, and every
//! department shares a pattern for formula/placeholder text. Normalization
//! never fails; unrecognized content passes through untouched.

use std::sync::LazyLock;

use regex::Regex;

use neuroscore_model::{CellValue, Department, Value};

/// Formula fragments and template captions that survive a sheet export.
static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^=|^raw$|^val$|^\[ERR\]$|^SS$").expect("invalid placeholder pattern")
});

/// Template captions and markers found in the adult workbook templates.
const ADULT_NAN_LITERALS: &[&str] = &[
    " --",
    "%tile",
    "9-Min",
    "BLUE",
    "Can.",
    "FM-1",
    "L",
    "LIM.",
    "Norm",
    "Performance Indicator",
    "R",
    "SS",
    "STD",
    "[ERR]",
    "[FORM]",
    "[NORM]",
    "[SPAN]",
    "[TIME]",
    "raw",
    "val",
];

/// Spreadsheet error markers and captions in the pediatric templates.
const PEDS_NAN_LITERALS: &[&str] = &["#N/A", "#REF!", "#VALUE!", "RAW", "Score"];

/// Per-department absent-value rules: a literal token set plus the shared
/// placeholder pattern. Injected into the extraction pass rather than baked
/// into a parser subclass.
#[derive(Debug, Clone)]
pub struct NanRules {
    literals: &'static [&'static str],
}

impl NanRules {
    pub fn for_department(dept: Department) -> Self {
        let literals = match dept {
            Department::Epilepsy | Department::Dementia | Department::Aphasia => {
                ADULT_NAN_LITERALS
            }
            Department::Peds | Department::Neonatology => PEDS_NAN_LITERALS,
        };
        Self { literals }
    }

    /// Whether the cell content collapses to "absent".
    pub fn is_absent(&self, cell: &CellValue) -> bool {
        match cell {
            CellValue::Empty => true,
            CellValue::Text(text) => {
                text.trim().is_empty()
                    || self.literals.contains(&text.as_str())
                    || PLACEHOLDER_PATTERN.is_match(text)
            }
            CellValue::Number(_) | CellValue::Date(_) => false,
        }
    }

    /// Normalize a cell to its extracted value, collapsing absents to None.
    pub fn normalize(&self, cell: &CellValue) -> Option<Value> {
        if self.is_absent(cell) {
            None
        } else {
            Value::from_cell(cell)
        }
    }
}
