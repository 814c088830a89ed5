//! Percentile-indexed score-scale reference table.
//!
//! Maps a percentile rank to the standard, scaled, and T values that are
//! valid for it. A percentile may list several values per scale, so band
//! queries return everything recorded for it.

use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::{LutError, Result};

/// One reference row, as loaded. Scales the table has no value for at this
/// percentile are `None`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PsychometricRow {
    pub percentile: f64,
    pub standard: Option<f64>,
    pub scaled: Option<f64>,
    pub ets: Option<f64>,
    pub t: Option<f64>,
    pub z: Option<f64>,
    pub description: Option<String>,
}

/// All score values the table records for one percentile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBands {
    pub standard: Vec<f64>,
    pub scaled: Vec<f64>,
    pub t: Vec<f64>,
}

impl ScoreBands {
    pub fn is_empty(&self) -> bool {
        self.standard.is_empty() && self.scaled.is_empty() && self.t.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PsychometricTable {
    rows: Vec<PsychometricRow>,
}

impl PsychometricTable {
    pub fn from_rows(rows: Vec<PsychometricRow>) -> Self {
        Self { rows }
    }

    /// Load from a CSV with columns `percentile_rank`, `standard_score`,
    /// `scaled_score`, `ets_score`, `t_score`, `z_score`, `description`.
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| LutError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = reader
            .headers()
            .map_err(|source| LutError::Parse {
                path: path.to_path_buf(),
                source,
            })?
            .clone();
        let column = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|header| header.trim_matches('\u{feff}').trim() == name)
                .ok_or_else(|| LutError::MissingColumn {
                    column: name.to_string(),
                    path: path.to_path_buf(),
                })
        };

        let percentile_col = column("percentile_rank")?;
        let standard_col = column("standard_score")?;
        let scaled_col = column("scaled_score")?;
        let ets_col = column("ets_score")?;
        let t_col = column("t_score")?;
        let z_col = column("z_score")?;
        let description_col = column("description")?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| LutError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
            let field = |col: usize| record.get(col).unwrap_or("").trim().to_string();
            let numeric = |col: usize| -> Option<f64> { field(col).parse().ok() };

            let percentile_raw = field(percentile_col);
            let percentile: f64 =
                percentile_raw
                    .parse()
                    .map_err(|_| LutError::InvalidField {
                        field: "percentile_rank",
                        value: percentile_raw.clone(),
                        path: path.to_path_buf(),
                    })?;

            rows.push(PsychometricRow {
                percentile,
                standard: numeric(standard_col),
                scaled: numeric(scaled_col),
                ets: numeric(ets_col),
                t: numeric(t_col),
                z: numeric(z_col),
                description: {
                    let value = field(description_col);
                    (!value.is_empty()).then_some(value)
                },
            });
        }

        Ok(Self { rows })
    }

    /// Every standard/scaled/T value recorded for `percentile`.
    pub fn bands(&self, percentile: f64) -> ScoreBands {
        let mut bands = ScoreBands::default();
        for row in &self.rows {
            if (row.percentile - percentile).abs() < f64::EPSILON {
                bands.standard.extend(row.standard);
                bands.scaled.extend(row.scaled);
                bands.t.extend(row.t);
            }
        }
        bands
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
