//! Workbook parser facade: resolves a worksheet once, then runs extraction
//! passes per timepoint against caller-supplied reference tables.

use tracing::info;

use neuroscore_lut::{Lut, PsychometricTable};
use neuroscore_model::{
    CellValue, DataLine, Department, Identifier, NewLine, Value, Worksheet,
};
use neuroscore_resolve::{filter_unhidden, find_first_data_row, resolve_from};

use crate::error::{ExtractError, Result};
use crate::extract::{Extraction, extract};

/// Reference tables for one run, loaded once by the caller and shared by
/// every parser instance.
#[derive(Debug, Clone, Copy)]
pub struct Refs<'a> {
    pub lut: &'a Lut,
    pub psychometric: &'a PsychometricTable,
}

/// One timepoint's extraction, kept separate so discrepancies stay
/// attributable to their source block.
#[derive(Debug, Clone)]
pub struct TimepointExtraction {
    pub timepoint: u32,
    pub extraction: Extraction,
}

/// Header fields read from the fixed template cells above the score grid.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Header {
    /// Exam date, formatted `%Y-%m-%d` downstream.
    pub test_date: chrono::NaiveDate,
    pub age: u32,
}

/// Exam-date row in the adult template.
const HEADER_DATE_ROW: u32 = 9;
/// Age row in the adult template.
const HEADER_AGE_ROW: u32 = 11;

/// Parses one worksheet. Construction runs the identifier resolver exactly
/// once; every subsequent timepoint extraction reuses the cached lines.
pub struct WorkbookParser<'a, S: Worksheet + ?Sized> {
    sheet: &'a S,
    dept: Department,
    first_data_row: u32,
    lines: Vec<DataLine>,
    unhidden_lines: Vec<DataLine>,
}

impl<'a, S: Worksheet + ?Sized> WorkbookParser<'a, S> {
    pub fn new(sheet: &'a S, dept: Department) -> Result<Self> {
        let layout = dept.layout();
        let first_data_row = find_first_data_row(sheet, layout)?;
        let lines = resolve_from(sheet, layout, first_data_row)?;
        let unhidden_lines = filter_unhidden(sheet, &lines);
        info!(
            dept = %dept,
            first_data_row,
            lines = lines.len(),
            visible = unhidden_lines.len(),
            "resolved worksheet"
        );
        Ok(Self {
            sheet,
            dept,
            first_data_row,
            lines,
            unhidden_lines,
        })
    }

    pub fn dept(&self) -> Department {
        self.dept
    }

    pub fn first_data_row(&self) -> u32 {
        self.first_data_row
    }

    /// Every resolved line, including hidden rows.
    pub fn lines(&self) -> &[DataLine] {
        &self.lines
    }

    /// Lines on visible rows; this is what extraction reads.
    pub fn unhidden_lines(&self) -> &[DataLine] {
        &self.unhidden_lines
    }

    /// Root-level identifiers, i.e. the tests administered in this sheet.
    pub fn administered_tests(&self) -> Vec<&Identifier> {
        self.lines
            .iter()
            .map(DataLine::identifier)
            .filter(|identifier| identifier.is_root())
            .collect()
    }

    /// Identifiers present in the sheet but absent from the LUT, over the
    /// unfiltered line set.
    pub fn find_new_lines(&self, lut: &Lut) -> Vec<NewLine> {
        self.lines
            .iter()
            .filter(|line| !lut.contains(&line.key))
            .map(NewLine::from_line)
            .collect()
    }

    /// Extract one timepoint's values and discrepancies. `timepoint` is
    /// 1-based.
    pub fn parse_data(&self, refs: Refs<'_>, timepoint: u32) -> Result<Extraction> {
        extract(
            self.sheet,
            &self.unhidden_lines,
            refs.lut,
            refs.psychometric,
            timepoint,
        )
    }

    /// Extract several timepoints. Output tables are concatenated per
    /// timepoint, never merged by key.
    pub fn parse_timepoints(
        &self,
        refs: Refs<'_>,
        timepoints: &[u32],
    ) -> Result<Vec<TimepointExtraction>> {
        timepoints
            .iter()
            .map(|&timepoint| {
                Ok(TimepointExtraction {
                    timepoint,
                    extraction: self.parse_data(refs, timepoint)?,
                })
            })
            .collect()
    }

    /// Read the fixed header cells for one timepoint (1-based). Only the
    /// adult template carries this layout.
    pub fn parse_header(&self, timepoint: u32) -> Result<Header> {
        if timepoint == 0 {
            return Err(ExtractError::InvalidTimepoint);
        }
        let stride = self.dept.layout().timepoint_stride;
        match self.dept {
            Department::Epilepsy | Department::Dementia | Department::Aphasia => {}
            Department::Peds | Department::Neonatology => {
                return Err(ExtractError::Header {
                    row: HEADER_DATE_ROW,
                    col: 0,
                    reason: format!("no fixed header layout for department {}", self.dept),
                });
            }
        }

        let date_col = 5 + (timepoint - 1) * stride;
        let age_col = 3 + (timepoint - 1) * stride;

        let test_date = match &self.sheet.cell(HEADER_DATE_ROW, date_col).value {
            CellValue::Date(date) => *date,
            other => {
                return Err(ExtractError::Header {
                    row: HEADER_DATE_ROW,
                    col: date_col,
                    reason: format!("expected a date cell, found {other:?}"),
                });
            }
        };

        let age_cell = &self.sheet.cell(HEADER_AGE_ROW, age_col).value;
        let age = age_cell
            .as_text()
            .and_then(parse_header_age)
            .ok_or_else(|| ExtractError::Header {
                row: HEADER_AGE_ROW,
                col: age_col,
                reason: format!("cannot parse age from {age_cell:?}"),
            })?;

        Ok(Header { test_date, age })
    }
}

/// The age cell reads like `Age: 54, Sex: M`; take the number after the
/// first colon, before the first comma.
fn parse_header_age(text: &str) -> Option<u32> {
    let first = text.split(',').next()?;
    let value = first.split(": ").nth(1)?;
    value.trim().parse().ok()
}

/// Convenience for callers that only want the extracted variables.
pub fn extraction_values(extraction: &Extraction) -> impl Iterator<Item = (&str, Option<&Value>)> {
    extraction
        .results
        .iter()
        .map(|(variable, value)| (variable.as_str(), value.as_ref()))
}
