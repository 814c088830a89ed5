//! Departments and their score-sheet column policies.
//!
//! Every department fills the same kind of workbook, but the label column,
//! the data columns underneath each line, and the per-column semantics vary.
//! The policy is data here, selected once, rather than a parser subclass per
//! department.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// The semantic of one physical data column underneath a score line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnSlot {
    Raw,
    Ss,
    Percentile,
    Sign,
    AgeEquivalent,
    HighEquivalent,
    DevelopmentalQuotient,
    Equivalent,
    Form,
    Notes,
    Gsv,
}

impl ColumnSlot {
    /// The column's name as it appears in LUT headers and discrepancy rows.
    pub fn name(self) -> &'static str {
        match self {
            ColumnSlot::Raw => "raw",
            ColumnSlot::Ss => "ss",
            ColumnSlot::Percentile => "percentile",
            ColumnSlot::Sign => "sign",
            ColumnSlot::AgeEquivalent => "age_equivalent",
            ColumnSlot::HighEquivalent => "high_equivalent",
            ColumnSlot::DevelopmentalQuotient => "developmental_quotient",
            ColumnSlot::Equivalent => "equivalent",
            ColumnSlot::Form => "form",
            ColumnSlot::Notes => "notes",
            ColumnSlot::Gsv => "gsv",
        }
    }
}

impl fmt::Display for ColumnSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const ADULT_SLOTS: &[ColumnSlot] = &[
    ColumnSlot::Raw,
    ColumnSlot::Ss,
    ColumnSlot::Percentile,
    ColumnSlot::Notes,
];

const PEDS_SLOTS: &[ColumnSlot] = &[
    ColumnSlot::Raw,
    ColumnSlot::Ss,
    ColumnSlot::Percentile,
    ColumnSlot::Sign,
    ColumnSlot::AgeEquivalent,
    ColumnSlot::HighEquivalent,
    ColumnSlot::DevelopmentalQuotient,
    ColumnSlot::Form,
    ColumnSlot::Notes,
];

const NEONATOLOGY_SLOTS: &[ColumnSlot] = &[
    ColumnSlot::Raw,
    ColumnSlot::Ss,
    ColumnSlot::Percentile,
    ColumnSlot::Equivalent,
    ColumnSlot::Form,
    ColumnSlot::Notes,
    ColumnSlot::Gsv,
];

/// How one physical data column is read and routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicalColumn {
    /// Verbatim value, routed to the named slot's destination.
    Slot(ColumnSlot),
    /// Score column whose scale (standard, scaled, T) must be classified
    /// before routing to the `ss` destination.
    ScoreScale,
    /// Textual equivalent column fanning out into the `sign`,
    /// `age_equivalent`, and `high_equivalent` destinations.
    Equivalent,
}

impl PhysicalColumn {
    /// Column name used in discrepancy rows.
    pub fn name(self) -> &'static str {
        match self {
            PhysicalColumn::Slot(slot) => slot.name(),
            PhysicalColumn::ScoreScale => "ss",
            PhysicalColumn::Equivalent => "equivalent",
        }
    }
}

const ADULT_COLUMNS: &[PhysicalColumn] = &[
    PhysicalColumn::Slot(ColumnSlot::Raw),
    PhysicalColumn::Slot(ColumnSlot::Ss),
    PhysicalColumn::Slot(ColumnSlot::Percentile),
    PhysicalColumn::Slot(ColumnSlot::Notes),
];

const PEDS_COLUMNS: &[PhysicalColumn] = &[
    PhysicalColumn::Slot(ColumnSlot::Raw),
    PhysicalColumn::ScoreScale,
    PhysicalColumn::Slot(ColumnSlot::Percentile),
    PhysicalColumn::Equivalent,
    PhysicalColumn::Slot(ColumnSlot::DevelopmentalQuotient),
    PhysicalColumn::Slot(ColumnSlot::Form),
    PhysicalColumn::Slot(ColumnSlot::Notes),
];

const NEONATOLOGY_COLUMNS: &[PhysicalColumn] = &[
    PhysicalColumn::Slot(ColumnSlot::Raw),
    PhysicalColumn::Slot(ColumnSlot::Ss),
    PhysicalColumn::Slot(ColumnSlot::Percentile),
    PhysicalColumn::Slot(ColumnSlot::Equivalent),
    PhysicalColumn::Slot(ColumnSlot::Form),
    PhysicalColumn::Slot(ColumnSlot::Notes),
    PhysicalColumn::Slot(ColumnSlot::Gsv),
];

/// Fixed cell addressing for a department's workbook template. All columns
/// are 1-based physical indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    /// Column holding the indented line labels.
    pub label_col: u32,
    /// Column whose header cell carries the literal `Raw` sentinel.
    pub sentinel_col: u32,
    /// First data column for timepoint 1.
    pub value_col_base: u32,
    /// Column distance between consecutive timepoint blocks.
    pub timepoint_stride: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Department {
    Peds,
    Epilepsy,
    Dementia,
    Aphasia,
    Neonatology,
}

impl Department {
    /// Ordered LUT destination slots: one column per slot in the LUT file.
    pub fn slots(self) -> &'static [ColumnSlot] {
        match self {
            Department::Peds => PEDS_SLOTS,
            Department::Neonatology => NEONATOLOGY_SLOTS,
            Department::Epilepsy | Department::Dementia | Department::Aphasia => ADULT_SLOTS,
        }
    }

    /// Ordered physical data columns underneath each line. For pediatric
    /// sheets this is narrower than [`slots`](Self::slots): the single
    /// textual equivalent column feeds three destination slots.
    pub fn physical_columns(self) -> &'static [PhysicalColumn] {
        match self {
            Department::Peds => PEDS_COLUMNS,
            Department::Neonatology => NEONATOLOGY_COLUMNS,
            Department::Epilepsy | Department::Dementia | Department::Aphasia => ADULT_COLUMNS,
        }
    }

    /// Position of a destination slot within this department's LUT columns.
    pub fn slot_index(self, slot: ColumnSlot) -> Option<usize> {
        self.slots().iter().position(|&s| s == slot)
    }

    pub fn layout(self) -> SheetLayout {
        match self {
            // Adult templates keep labels in column B; three exam blocks of
            // four columns each start at column C.
            Department::Epilepsy | Department::Dementia | Department::Aphasia => SheetLayout {
                label_col: 2,
                sentinel_col: 3,
                value_col_base: 3,
                timepoint_stride: 4,
            },
            // Pediatric templates shift one column right and carry a wider
            // column block.
            Department::Peds | Department::Neonatology => SheetLayout {
                label_col: 3,
                sentinel_col: 4,
                value_col_base: 4,
                timepoint_stride: self.physical_columns().len() as u32,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Department::Peds => "peds",
            Department::Epilepsy => "epilepsy",
            Department::Dementia => "dementia",
            Department::Aphasia => "aphasia",
            Department::Neonatology => "neonatology",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "peds" => Ok(Department::Peds),
            "epilepsy" => Ok(Department::Epilepsy),
            "dementia" => Ok(Department::Dementia),
            "aphasia" => Ok(Department::Aphasia),
            "neonatology" => Ok(Department::Neonatology),
            _ => Err(ModelError::UnknownDepartment(s.to_string())),
        }
    }
}
