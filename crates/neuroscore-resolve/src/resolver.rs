//! Reconstructs test/subtest/item identities from the visually-indented
//! label column of a score sheet.
//!
//! The hierarchy is never materialized as a tree. A label stack tracks the
//! ancestor chain of the current line, and indentation is normalized to a
//! rank derived from the order raw indent units first appear along the
//! current test block, not from their numeric value. The transition rules
//! are a behavioral contract inherited from years of production sheets:
//!
//! - same rank: replace the stack top (a sibling);
//! - deeper rank: push (a child);
//! - rank 0 after deeper lines: hard reset, a new test block begins;
//! - shallower nonzero rank: pop exactly twice, then push.
//!
//! The two-pop dedent does not generalize to dedents spanning more than one
//! rank. That input is logged and still handled by the two-pop rule, since
//! the intended shape of such sheets is unknown.

use std::collections::HashMap;

use tracing::{debug, warn};

use neuroscore_model::{DataLine, Identifier, SheetLayout, Worksheet};

use crate::error::{Result, StructureError};

/// Sentinel header text marking the top of the score grid.
const SENTINEL: &str = "Raw";

/// Scan for the first data row: the first nonblank label cell below the
/// `Raw` sentinel header.
pub fn find_first_data_row<S>(sheet: &S, layout: SheetLayout) -> Result<u32>
where
    S: Worksheet + ?Sized,
{
    let max_row = sheet.max_row();

    let sentinel_row = (1..=max_row)
        .find(|&row| {
            sheet
                .cell(row, layout.sentinel_col)
                .value
                .as_text()
                .is_some_and(|text| text.trim() == SENTINEL)
        })
        .ok_or(StructureError::SentinelNotFound {
            sentinel_col: layout.sentinel_col,
        })?;

    (sentinel_row + 1..=max_row)
        .find(|&row| !sheet.cell(row, layout.label_col).value.is_blank())
        .ok_or(StructureError::FirstDataRowNotFound {
            label_col: layout.label_col,
            sentinel_row,
        })
}

/// Sequential resolver state. Transitions depend on the immediately
/// preceding row's resolved rank, so rows must be fed in sheet order.
struct Resolver {
    unique_stack: Vec<String>,
    test_counter: HashMap<String, u32>,
    current_test: String,
    /// Raw indent unit -> resolved rank, in order of first appearance along
    /// the current test block.
    indent_mapper: HashMap<u32, u32>,
    /// Raw unit most recently granted a fresh rank.
    p_indent_key: u32,
    /// Resolved rank of the previous emitted line.
    p_indent: u32,
}

impl Resolver {
    /// Seed from the first data row, which is always a rank-0 test line.
    fn seed(label: &str, raw_indent: u32) -> Self {
        let mut test_counter = HashMap::new();
        test_counter.insert(label.to_string(), 1);
        Self {
            unique_stack: vec![label.to_string()],
            test_counter,
            current_test: label.to_string(),
            indent_mapper: HashMap::from([(raw_indent, 0)]),
            p_indent_key: raw_indent,
            p_indent: 0,
        }
    }

    fn bump_test(&mut self, label: &str) {
        self.current_test = label.to_string();
        *self.test_counter.entry(label.to_string()).or_insert(0) += 1;
    }

    /// Translate a raw indent unit into its rank, assigning the next unused
    /// rank the first time a unit appears on this test block.
    fn rank_of(&mut self, raw_indent: u32) -> u32 {
        if let Some(&rank) = self.indent_mapper.get(&raw_indent) {
            return rank;
        }
        let rank = self.indent_mapper[&self.p_indent_key] + 1;
        self.indent_mapper.insert(raw_indent, rank);
        self.p_indent_key = raw_indent;
        rank
    }

    /// Apply one non-skipped row and emit its data line.
    fn step(&mut self, row: u32, raw_text: &str, raw_indent: u32) -> Result<DataLine> {
        // Some sheets encode part of the indent as leading whitespace
        // instead of the cell's alignment property.
        let raw_indent = if raw_text.starts_with(' ') {
            raw_indent + 1
        } else {
            raw_indent
        };
        let c_indent = self.rank_of(raw_indent);
        let label = raw_text.trim();

        debug!(row, label, rank = c_indent, "resolved line");

        if c_indent == self.p_indent {
            self.unique_stack.pop();
            self.unique_stack.push(label.to_string());
            if c_indent == 0 {
                self.bump_test(label);
            }
        } else if c_indent > self.p_indent {
            self.unique_stack.push(label.to_string());
        } else if c_indent == 0 {
            // Hard reset: a new test block starts and the raw-unit chain
            // restarts with it. The fresh mapper is keyed by the resolved
            // rank, so the old block's raw units all read as unseen,
            // including the one that carried rank 0.
            self.unique_stack.clear();
            self.bump_test(label);
            self.indent_mapper = HashMap::from([(0, 0)]);
            self.p_indent_key = 0;
            self.unique_stack.push(label.to_string());
        } else {
            if self.p_indent - c_indent > 1 {
                warn!(
                    row,
                    label,
                    from = self.p_indent,
                    to = c_indent,
                    "dedent spans more than one rank; applying two-pop rule"
                );
            }
            if self.unique_stack.len() < 2 {
                return Err(StructureError::DedentUnderflow { row });
            }
            self.unique_stack.pop();
            self.unique_stack.pop();
            self.unique_stack.push(label.to_string());
        }

        self.p_indent = c_indent;

        Ok(DataLine::new(
            Identifier::from_stack(&self.unique_stack),
            self.test_counter[&self.current_test],
            row,
        ))
    }
}

/// A row is data only when its label cell holds nonblank text that is not a
/// `*`-prefixed annotation.
fn data_label(sheet: &(impl Worksheet + ?Sized), row: u32, label_col: u32) -> Option<(String, u32)> {
    let cell = sheet.cell(row, label_col);
    let text = cell.value.as_text()?;
    let stripped = text.trim();
    if stripped.is_empty() || stripped.starts_with('*') {
        return None;
    }
    Some((text.to_string(), cell.indent))
}

/// Walk the label column top to bottom and produce every score line in
/// sheet order.
pub fn resolve<S>(sheet: &S, layout: SheetLayout) -> Result<Vec<DataLine>>
where
    S: Worksheet + ?Sized,
{
    let first_data_row = find_first_data_row(sheet, layout)?;
    resolve_from(sheet, layout, first_data_row)
}

/// [`resolve`] starting from an already-detected first data row.
pub fn resolve_from<S>(sheet: &S, layout: SheetLayout, first_data_row: u32) -> Result<Vec<DataLine>>
where
    S: Worksheet + ?Sized,
{
    let seed_cell = sheet.cell(first_data_row, layout.label_col);
    let seed_label = seed_cell
        .value
        .as_text()
        .filter(|text| !text.trim().is_empty())
        .ok_or(StructureError::MissingSeedLabel {
            row: first_data_row,
        })?;

    let mut resolver = Resolver::seed(seed_label, seed_cell.indent);
    let mut lines = vec![DataLine::new(
        Identifier::new(seed_label),
        1,
        first_data_row,
    )];

    for row in first_data_row + 1..=sheet.max_row() {
        if let Some((text, indent)) = data_label(sheet, row, layout.label_col) {
            lines.push(resolver.step(row, &text, indent)?);
        }
    }

    Ok(lines)
}

/// [`resolve`], minus lines on hidden rows. Extraction reads only visible
/// rows; the unfiltered set is kept for administered-test enumeration.
pub fn resolve_unhidden<S>(sheet: &S, layout: SheetLayout) -> Result<Vec<DataLine>>
where
    S: Worksheet + ?Sized,
{
    let lines = resolve(sheet, layout)?;
    Ok(filter_unhidden(sheet, &lines))
}

/// Drop lines whose row is marked hidden in the sheet metadata.
pub fn filter_unhidden<S>(sheet: &S, lines: &[DataLine]) -> Vec<DataLine>
where
    S: Worksheet + ?Sized,
{
    lines
        .iter()
        .filter(|line| !sheet.row_hidden(line.row))
        .cloned()
        .collect()
}
