//! Blank-LUT initialization from a reference workbook.
//!
//! Runs the resolver over a department's reference sheet and emits the
//! skeleton rows of a new lookup table, one per resolved line, with the
//! variable slots left for a human to fill in.

use neuroscore_model::{Department, Identifier, Worksheet};
use neuroscore_resolve::{StructureError, resolve};

/// One skeleton row of a blank LUT.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LutSeed {
    /// Root test label the row belongs to.
    pub test: String,
    pub test_no: u32,
    pub identifier: Identifier,
}

/// Resolve every line of `sheet` into LUT skeleton rows.
pub fn initialize_lut<S>(sheet: &S, dept: Department) -> Result<Vec<LutSeed>, StructureError>
where
    S: Worksheet + ?Sized,
{
    let lines = resolve(sheet, dept.layout())?;
    Ok(lines
        .into_iter()
        .map(|line| LutSeed {
            test: line.identifier().root().to_string(),
            test_no: line.test_no(),
            identifier: line.key.identifier,
        })
        .collect())
}
