//! The per-line extraction pass: join resolved lines against the LUT, read
//! the data cells underneath each line, and route every value to its output
//! variable or to a discrepancy table.

use indexmap::IndexMap;
use tracing::debug;

use neuroscore_lut::{Lut, PsychometricTable};
use neuroscore_model::{
    ColumnSlot, DataLine, Department, MissingLine, NewLine, PhysicalColumn, Value, Worksheet,
};

use crate::equivalent::{EquivalentValue, parse_equivalent};
use crate::error::{ExtractError, Result};
use crate::nan::NanRules;
use crate::scores::classify_ss;

/// Output variable -> extracted value. Insertion-ordered; assignment is
/// last-write-wins, matching the source system's record semantics. A `None`
/// value keeps the variable present in the output row with an empty cell.
pub type ExtractionResult = IndexMap<String, Option<Value>>;

/// One extraction pass's three output tables.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub results: ExtractionResult,
    pub new_lines: Vec<NewLine>,
    pub missing_lines: Vec<MissingLine>,
}

impl Extraction {
    /// Route one value to a destination slot: named slots receive the value
    /// (even when absent), unnamed slots with a present value become
    /// missing-mapping rows.
    fn route(
        &mut self,
        dept: Department,
        slots: &[Option<String>],
        slot: ColumnSlot,
        value: Option<Value>,
        col_name: &str,
        line: &DataLine,
        col: u32,
    ) {
        let dest = dept
            .slot_index(slot)
            .and_then(|index| slots.get(index))
            .and_then(Option::as_ref);

        match dest {
            Some(variable) => {
                self.results.insert(variable.clone(), value);
            }
            None => {
                if let Some(value) = value {
                    self.missing_lines.push(MissingLine {
                        identifier: line.identifier().clone(),
                        test_no: line.test_no(),
                        row: line.row,
                        col,
                        name: col_name.to_string(),
                        value,
                    });
                }
            }
        }
    }

    fn flag_unmapped(&mut self, line: &DataLine, col: u32, col_name: &str, value: Value) {
        self.missing_lines.push(MissingLine {
            identifier: line.identifier().clone(),
            test_no: line.test_no(),
            row: line.row,
            col,
            name: col_name.to_string(),
            value,
        });
    }
}

/// Fan an equivalent-column value out into the sign, age-equivalent, and
/// high-equivalent destinations.
fn route_equivalent(
    out: &mut Extraction,
    dept: Department,
    slots: &[Option<String>],
    value: Option<Value>,
    line: &DataLine,
    col: u32,
) {
    let col_name = "equivalent";
    let (sign, age, high) = match value {
        None => (None, None, None),
        Some(Value::Number(n)) => {
            // A bare number is already a month count.
            (None, Some(Value::Number(n)), None)
        }
        Some(Value::Text(text)) => match parse_equivalent(&text) {
            EquivalentValue::Sign(token) => (Some(Value::Text(token)), None, None),
            EquivalentValue::Age(months) => (None, Some(Value::Number(f64::from(months))), None),
            EquivalentValue::AgeRange { low, high } => (
                None,
                Some(Value::Number(f64::from(low))),
                Some(Value::Number(f64::from(high))),
            ),
            EquivalentValue::Unparsed(text) => {
                out.flag_unmapped(line, col, col_name, Value::Text(text));
                (None, None, None)
            }
        },
        Some(other) => {
            out.flag_unmapped(line, col, col_name, other);
            (None, None, None)
        }
    };

    out.route(dept, slots, ColumnSlot::Sign, sign, col_name, line, col);
    out.route(dept, slots, ColumnSlot::AgeEquivalent, age, col_name, line, col);
    out.route(dept, slots, ColumnSlot::HighEquivalent, high, col_name, line, col);
}

/// Extract one timepoint's values for the given resolved lines. `timepoint`
/// is 1-based.
///
/// `lines` should be the hidden-row-filtered line set; hidden rows hold
/// template machinery, not data. Discrepancies accumulate in the returned
/// [`Extraction`] alongside the results.
pub fn extract<S>(
    sheet: &S,
    lines: &[DataLine],
    lut: &Lut,
    psychometric: &PsychometricTable,
    timepoint: u32,
) -> Result<Extraction>
where
    S: Worksheet + ?Sized,
{
    if timepoint == 0 {
        return Err(ExtractError::InvalidTimepoint);
    }

    let dept = lut.dept();
    let layout = dept.layout();
    let rules = NanRules::for_department(dept);
    let columns = dept.physical_columns();
    let base = layout.value_col_base + (timepoint - 1) * layout.timepoint_stride;

    let mut out = Extraction::default();

    for line in lines {
        let Some(slots) = lut.get(&line.key) else {
            out.new_lines.push(NewLine::from_line(line));
            continue;
        };

        let cells: Vec<Option<Value>> = (0..columns.len() as u32)
            .map(|n| rules.normalize(&sheet.cell(line.row, base + n).value))
            .collect();

        let percentile = columns
            .iter()
            .position(|column| matches!(column, PhysicalColumn::Slot(ColumnSlot::Percentile)))
            .and_then(|index| cells[index].as_ref())
            .and_then(Value::as_number);

        for (n, column) in columns.iter().enumerate() {
            let col = base + n as u32;
            let value = cells[n].clone();

            match column {
                PhysicalColumn::Slot(slot) => {
                    out.route(dept, slots, *slot, value, column.name(), line, col);
                }
                PhysicalColumn::ScoreScale => {
                    let classified = match value {
                        None => None,
                        Some(raw) => {
                            let classified = classify_ss(&raw, percentile, psychometric)
                                .ok_or_else(|| ExtractError::Classification {
                                    row: line.row,
                                    col,
                                    value: raw.to_string(),
                                })?;
                            debug!(
                                row = line.row,
                                col,
                                kind = ?classified.kind,
                                "classified score scale"
                            );
                            Some(Value::Number(classified.value))
                        }
                    };
                    out.route(
                        dept,
                        slots,
                        ColumnSlot::Ss,
                        classified,
                        column.name(),
                        line,
                        col,
                    );
                }
                PhysicalColumn::Equivalent => {
                    route_equivalent(&mut out, dept, slots, value, line, col);
                }
            }
        }
    }

    debug!(
        timepoint,
        results = out.results.len(),
        new_lines = out.new_lines.len(),
        missing_lines = out.missing_lines.len(),
        "extraction pass complete"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use neuroscore_model::{Cell, GridSheet, LineKey};

    fn adult_lut(entries: Vec<(LineKey, Vec<Option<String>>)>) -> Lut {
        Lut::from_entries(Department::Epilepsy, entries)
    }

    fn var(name: &str) -> Option<String> {
        Some(name.to_string())
    }

    #[test]
    fn lut_miss_becomes_a_new_line() {
        let sheet = GridSheet::new();
        let lut = adult_lut(vec![]);
        let lines = vec![DataLine::new("Unknown Test", 1, 5)];

        let out = extract(&sheet, &lines, &lut, &PsychometricTable::default(), 1).unwrap();
        assert!(out.results.is_empty());
        assert_eq!(out.new_lines.len(), 1);
        assert_eq!(out.new_lines[0].identifier.as_str(), "Unknown Test");
        assert_eq!(out.new_lines[0].row, 5);
    }

    #[test]
    fn timepoint_zero_is_rejected() {
        let sheet = GridSheet::new();
        let lut = adult_lut(vec![]);
        let err = extract(&sheet, &[], &lut, &PsychometricTable::default(), 0).unwrap_err();
        assert!(matches!(err, ExtractError::InvalidTimepoint));
    }

    #[test]
    fn named_slots_receive_values_at_the_timepoint_offset() {
        // Timepoint 2 reads columns 7..=10 on the adult layout.
        let sheet = GridSheet::new()
            .with(4, 7, Cell::number(30.0))
            .with(4, 8, Cell::number(55.0));
        let lut = adult_lut(vec![(
            LineKey::new("TOMM | Trial 1", 1),
            vec![var("tomm1_raw"), var("tomm1_ss"), None, None],
        )]);
        let lines = vec![DataLine::new("TOMM | Trial 1", 1, 4)];

        let out = extract(&sheet, &lines, &lut, &PsychometricTable::default(), 2).unwrap();
        assert_eq!(out.results["tomm1_raw"], Some(Value::Number(30.0)));
        assert_eq!(out.results["tomm1_ss"], Some(Value::Number(55.0)));
        assert!(out.missing_lines.is_empty());
    }

    #[test]
    fn absent_cells_keep_named_variables_present() {
        let sheet = GridSheet::new().with(4, 3, Cell::text("[ERR]"));
        let lut = adult_lut(vec![(
            LineKey::new("BNT", 1),
            vec![var("bnt_raw"), None, None, None],
        )]);
        let lines = vec![DataLine::new("BNT", 1, 4)];

        let out = extract(&sheet, &lines, &lut, &PsychometricTable::default(), 1).unwrap();
        assert_eq!(out.results["bnt_raw"], None);
        assert!(out.missing_lines.is_empty());
    }

    #[test]
    fn unnamed_slot_with_value_is_a_missing_mapping() {
        let sheet = GridSheet::new()
            .with(4, 3, Cell::number(5.0))
            .with(4, 4, Cell::number(7.0));
        let lut = adult_lut(vec![(
            LineKey::new("BNT", 1),
            vec![None, var("var_b"), None, None],
        )]);
        let lines = vec![DataLine::new("BNT", 1, 4)];

        let out = extract(&sheet, &lines, &lut, &PsychometricTable::default(), 1).unwrap();
        assert_eq!(out.results.len(), 1);
        assert_eq!(out.results["var_b"], Some(Value::Number(7.0)));
        assert_eq!(out.missing_lines.len(), 1);
        assert_eq!(out.missing_lines[0].col, 3);
        assert_eq!(out.missing_lines[0].name, "raw");
        assert_eq!(out.missing_lines[0].value, Value::Number(5.0));
    }

    #[test]
    fn later_lines_overwrite_shared_variables() {
        let sheet = GridSheet::new()
            .with(4, 3, Cell::number(1.0))
            .with(9, 3, Cell::number(2.0));
        let lut = adult_lut(vec![
            (LineKey::new("A", 1), vec![var("shared"), None, None, None]),
            (LineKey::new("B", 1), vec![var("shared"), None, None, None]),
        ]);
        let lines = vec![DataLine::new("A", 1, 4), DataLine::new("B", 1, 9)];

        let out = extract(&sheet, &lines, &lut, &PsychometricTable::default(), 1).unwrap();
        assert_eq!(out.results["shared"], Some(Value::Number(2.0)));
    }

    #[test]
    fn peds_equivalent_column_fans_out() {
        // Peds layout: values start at column 4; equivalent is the fourth
        // physical column (7).
        let sheet = GridSheet::new().with(4, 7, Cell::text("4:6-5:0"));
        let lut = Lut::from_entries(
            Department::Peds,
            vec![(
                LineKey::new("Bayley-III | Cognitive", 1),
                vec![
                    None,
                    None,
                    None,
                    var("cog_sign"),
                    var("cog_age"),
                    var("cog_high"),
                    None,
                    None,
                    None,
                ],
            )],
        );
        let lines = vec![DataLine::new("Bayley-III | Cognitive", 1, 4)];

        let out = extract(&sheet, &lines, &lut, &PsychometricTable::default(), 1).unwrap();
        assert_eq!(out.results["cog_age"], Some(Value::Number(54.0)));
        assert_eq!(out.results["cog_high"], Some(Value::Number(60.0)));
        assert_eq!(out.results["cog_sign"], None);
        assert!(out.missing_lines.is_empty());
    }

    #[test]
    fn peds_unparsed_equivalent_is_flagged() {
        let sheet = GridSheet::new().with(4, 7, Cell::text("ceiling"));
        let lut = Lut::from_entries(
            Department::Peds,
            vec![(
                LineKey::new("Bayley-III | Cognitive", 1),
                vec![None; 9],
            )],
        );
        let lines = vec![DataLine::new("Bayley-III | Cognitive", 1, 4)];

        let out = extract(&sheet, &lines, &lut, &PsychometricTable::default(), 1).unwrap();
        assert_eq!(out.missing_lines.len(), 1);
        assert_eq!(out.missing_lines[0].name, "equivalent");
        assert_eq!(out.missing_lines[0].value, Value::Text("ceiling".to_string()));
    }

    #[test]
    fn peds_ss_classification_failure_aborts_the_line() {
        let sheet = GridSheet::new().with(4, 5, Cell::number(500.0));
        let lut = Lut::from_entries(
            Department::Peds,
            vec![(
                LineKey::new("Bayley-III | Cognitive", 1),
                vec![None, var("cog_ss"), None, None, None, None, None, None, None],
            )],
        );
        let lines = vec![DataLine::new("Bayley-III | Cognitive", 1, 4)];

        let err = extract(&sheet, &lines, &lut, &PsychometricTable::default(), 1).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Classification { row: 4, col: 5, .. }
        ));
    }
}
