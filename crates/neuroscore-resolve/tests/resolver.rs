//! Resolver behavior over synthetic worksheets.

use neuroscore_model::{Cell, Department, GridSheet, Worksheet};
use neuroscore_resolve::{
    StructureError, filter_unhidden, find_first_data_row, resolve, resolve_unhidden,
};

/// Builds an adult-template sheet: `Raw` sentinel on row 1, labels in
/// column B starting at row 2, with the given alignment indents.
fn label_sheet(labels: &[(&str, u32)]) -> GridSheet {
    let mut sheet = GridSheet::new().with(1, 3, Cell::text("Raw"));
    for (i, (text, indent)) in labels.iter().enumerate() {
        sheet.set(
            2 + i as u32,
            2,
            Cell::text(*text).with_indent(*indent),
        );
    }
    sheet
}

fn identifiers(sheet: &GridSheet) -> Vec<String> {
    resolve(sheet, Department::Epilepsy.layout())
        .expect("resolve")
        .iter()
        .map(|line| line.identifier().as_str().to_string())
        .collect()
}

#[test]
fn seed_row_is_emitted_as_root() {
    let sheet = label_sheet(&[("TOMM", 0)]);
    let lines = resolve(&sheet, Department::Epilepsy.layout()).unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].identifier().as_str(), "TOMM");
    assert_eq!(lines[0].test_no(), 1);
    assert_eq!(lines[0].row, 2);
}

#[test]
fn dedent_pops_twice_then_pushes() {
    // Ranks 0, 1, 2, 1: the fourth line keeps only the root above it.
    let sheet = label_sheet(&[("A", 0), ("B", 1), ("C", 2), ("D", 1)]);
    assert_eq!(identifiers(&sheet), vec!["A", "A | B", "A | B | C", "A | D"]);
}

#[test]
fn row_order_is_preserved_and_skips_are_absent() {
    let mut sheet = label_sheet(&[("A", 0), ("B", 1)]);
    sheet.set(4, 2, Cell::text("   "));
    sheet.set(5, 2, Cell::text("* administered under protest"));
    sheet.set(6, 2, Cell::text("C").with_indent(1));

    let lines = resolve(&sheet, Department::Epilepsy.layout()).unwrap();
    let rows: Vec<u32> = lines.iter().map(|line| line.row).collect();
    assert_eq!(rows, vec![2, 3, 6]);
    assert!(rows.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn repeated_test_blocks_count_occurrences() {
    let sheet = label_sheet(&[
        ("WMS-IV", 0),
        ("Logical Memory I", 1),
        ("WMS-IV", 0),
        ("Logical Memory I", 1),
    ]);
    let lines = resolve(&sheet, Department::Epilepsy.layout()).unwrap();
    let occurrences: Vec<u32> = lines.iter().map(|line| line.test_no()).collect();
    assert_eq!(occurrences, vec![1, 1, 2, 2]);
    assert_eq!(lines[1].identifier().as_str(), "WMS-IV | Logical Memory I");
    assert_eq!(lines[3].identifier().as_str(), "WMS-IV | Logical Memory I");
}

#[test]
fn sibling_roots_each_start_their_own_counter() {
    let sheet = label_sheet(&[("TOMM", 0), ("BNT", 0), ("TOMM", 0)]);
    let lines = resolve(&sheet, Department::Epilepsy.layout()).unwrap();
    assert_eq!(lines[0].test_no(), 1);
    assert_eq!(lines[1].test_no(), 1);
    assert_eq!(lines[2].test_no(), 2);
}

#[test]
fn resolution_is_deterministic() {
    let sheet = label_sheet(&[("A", 0), ("B", 2), ("C", 5), ("D", 2), ("E", 0)]);
    let first = resolve(&sheet, Department::Epilepsy.layout()).unwrap();
    let second = resolve(&sheet, Department::Epilepsy.layout()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn ranks_follow_first_appearance_not_raw_value() {
    // Raw units 0, 3, 7 resolve to ranks 0, 1, 2.
    let sheet = label_sheet(&[("A", 0), ("B", 3), ("C", 7)]);
    assert_eq!(identifiers(&sheet), vec!["A", "A | B", "A | B | C"]);
}

#[test]
fn leading_space_bumps_the_raw_indent() {
    // " B" carries no alignment indent but its leading space makes it a
    // child of A.
    let sheet = label_sheet(&[("A", 0), (" B", 0)]);
    assert_eq!(identifiers(&sheet), vec!["A", "A | B"]);
}

#[test]
fn multi_rank_dedent_still_pops_twice() {
    // E dedents from rank 3 to rank 1, a delta of two, yet the two-pop
    // rule applies unchanged: only C and D come off the stack.
    let sheet = label_sheet(&[("A", 0), ("B", 1), ("C", 2), ("D", 3), ("E", 1)]);
    assert_eq!(
        identifiers(&sheet),
        vec!["A", "A | B", "A | B | C", "A | B | C | D", "A | B | E"]
    );
}

#[test]
fn reset_mapper_is_keyed_by_rank_not_raw_unit() {
    // Root labels indented one raw unit: after the reset at C, raw unit 1
    // no longer means rank 0, so E lands underneath D instead of starting
    // a new block.
    let sheet = label_sheet(&[("A", 1), ("B", 2), ("C", 1), ("D", 2), ("E", 1)]);
    assert_eq!(
        identifiers(&sheet),
        vec!["A", "A | B", "C", "C | D", "C | D | E"]
    );
}

#[test]
fn rank_zero_dedent_resets_the_raw_unit_chain() {
    // After the reset at E, raw unit 3 is fresh again and maps to rank 1.
    let sheet = label_sheet(&[("A", 0), ("B", 3), ("C", 7), ("E", 0), ("F", 7)]);
    assert_eq!(
        identifiers(&sheet),
        vec!["A", "A | B", "A | B | C", "E", "E | F"]
    );
}

#[test]
fn hidden_rows_are_filtered_from_extraction_lines() {
    let mut sheet = label_sheet(&[("A", 0), ("B", 1), ("C", 1)]);
    sheet.hide_row(3);

    let layout = Department::Epilepsy.layout();
    let all = resolve(&sheet, layout).unwrap();
    let visible = resolve_unhidden(&sheet, layout).unwrap();

    assert_eq!(all.len(), 3);
    assert_eq!(visible.len(), 2);
    assert_eq!(visible, filter_unhidden(&sheet, &all));
    assert!(visible.iter().all(|line| line.row != 3));
}

#[test]
fn missing_sentinel_is_a_structure_error() {
    let sheet = GridSheet::new().with(1, 2, Cell::text("A"));
    let err = resolve(&sheet, Department::Epilepsy.layout()).unwrap_err();
    assert!(matches!(err, StructureError::SentinelNotFound { .. }));
}

#[test]
fn sentinel_without_data_is_a_structure_error() {
    let sheet = GridSheet::new()
        .with(1, 3, Cell::text("Raw"))
        .with(4, 3, Cell::text("filler"));
    let err = resolve(&sheet, Department::Epilepsy.layout()).unwrap_err();
    assert!(matches!(err, StructureError::FirstDataRowNotFound { .. }));
}

#[test]
fn numeric_seed_cell_is_a_structure_error() {
    let sheet = GridSheet::new()
        .with(1, 3, Cell::text("Raw"))
        .with(2, 2, Cell::number(42.0));
    let err = resolve(&sheet, Department::Epilepsy.layout()).unwrap_err();
    assert!(matches!(err, StructureError::MissingSeedLabel { row: 2 }));
}

#[test]
fn first_data_row_skips_blank_rows_below_sentinel() {
    let sheet = GridSheet::new()
        .with(3, 3, Cell::text("Raw"))
        .with(4, 2, Cell::text(""))
        .with(6, 2, Cell::text("A"));
    let row = find_first_data_row(&sheet, Department::Epilepsy.layout()).unwrap();
    assert_eq!(row, 6);
    assert_eq!(sheet.max_row(), 6);
}

#[test]
fn peds_layout_reads_labels_from_column_c() {
    let sheet = GridSheet::new()
        .with(1, 4, Cell::text("Raw"))
        .with(2, 3, Cell::text("Bayley-III"))
        .with(3, 3, Cell::text("Cognitive").with_indent(1));
    let lines = resolve(&sheet, Department::Peds.layout()).unwrap();
    assert_eq!(lines[1].identifier().as_str(), "Bayley-III | Cognitive");
}
