//! The identifier -> output-variable lookup table.
//!
//! Each entry maps a (identifier, test_no) key to one slot per physical
//! data column, in the department's fixed column order. An empty slot means
//! the column has no destination variable; values found there are surfaced
//! as missing-mapping discrepancies rather than silently dropped.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use neuroscore_model::{Department, Identifier, LineKey};

use crate::error::{LutError, Result};

/// One loaded LUT row: the destination variable (or nothing) per column
/// slot, in department slot order.
pub type SlotRow = Vec<Option<String>>;

#[derive(Debug, Clone)]
pub struct Lut {
    dept: Department,
    entries: HashMap<LineKey, SlotRow>,
    /// Identifiers in file order, for level queries and diagnostics.
    identifiers: Vec<Identifier>,
}

impl Lut {
    /// Build from already-materialized entries. This is the seam tests and
    /// callers with synthetic tables use; nothing is loaded at import time.
    pub fn from_entries<I>(dept: Department, entries: I) -> Self
    where
        I: IntoIterator<Item = (LineKey, SlotRow)>,
    {
        let mut map = HashMap::new();
        let mut identifiers = Vec::new();
        for (key, slots) in entries {
            identifiers.push(key.identifier.clone());
            map.insert(key, slots);
        }
        Self {
            dept,
            entries: map,
            identifiers,
        }
    }

    /// Load from a delimited file with columns `identifier`, `test_no`, and
    /// one column per department slot name. `.tsv` files are tab-delimited;
    /// anything else is treated as comma-delimited.
    pub fn from_delimited_path(dept: Department, path: &Path) -> Result<Self> {
        let delimiter = match path.extension().and_then(|ext| ext.to_str()) {
            Some("tsv") => b'\t',
            _ => b',',
        };

        let file = File::open(path).map_err(|source| LutError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(file);

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

        let identifier_col = column("identifier")?;
        let test_no_col = column("test_no")?;
        let slot_cols = dept
            .slots()
            .iter()
            .map(|slot| column(slot.name()))
            .collect::<Result<Vec<_>>>()?;

        let mut entries = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| LutError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

            let identifier = record.get(identifier_col).unwrap_or("").trim();
            if identifier.is_empty() {
                continue;
            }
            let test_no_raw = record.get(test_no_col).unwrap_or("").trim();
            let test_no: u32 =
                test_no_raw
                    .parse()
                    .map_err(|_| LutError::InvalidField {
                        field: "test_no",
                        value: test_no_raw.to_string(),
                        path: path.to_path_buf(),
                    })?;

            let slots: SlotRow = slot_cols
                .iter()
                .map(|&col| {
                    let value = record.get(col).unwrap_or("").trim();
                    (!value.is_empty()).then(|| value.to_string())
                })
                .collect();

            entries.push((LineKey::new(identifier, test_no), slots));
        }

        debug!(dept = %dept, entries = entries.len(), path = %path.display(), "loaded lut");
        Ok(Self::from_entries(dept, entries))
    }

    pub fn dept(&self) -> Department {
        self.dept
    }

    pub fn get(&self, key: &LineKey) -> Option<&[Option<String>]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: &LineKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `level`-th path segment of every loaded identifier, in file
    /// order; empty where the path is shorter.
    pub fn headers_at_level(&self, level: usize) -> Vec<String> {
        self.identifiers
            .iter()
            .map(|identifier| {
                identifier
                    .segments()
                    .nth(level)
                    .unwrap_or("")
                    .to_string()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_named(content: &str, suffix: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(suffix)
            .tempfile()
            .unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn loads_comma_delimited_with_empty_slots() {
        let file = write_named(
            "identifier,test_no,raw,ss,percentile,notes\n\
             TOMM | Trial 1,1,tomm_t1_raw,,tomm_t1_pct,\n",
            ".csv",
        );
        let lut = Lut::from_delimited_path(Department::Epilepsy, file.path()).unwrap();

        let key = LineKey::new("TOMM | Trial 1", 1);
        assert_eq!(
            lut.get(&key).unwrap(),
            &[
                Some("tomm_t1_raw".to_string()),
                None,
                Some("tomm_t1_pct".to_string()),
                None,
            ]
        );
    }

    #[test]
    fn loads_tab_delimited_by_extension() {
        let file = write_named(
            "identifier\ttest_no\traw\tss\tpercentile\tnotes\nBNT\t2\tbnt_raw\tbnt_ss\t\t\n",
            ".tsv",
        );
        let lut = Lut::from_delimited_path(Department::Aphasia, file.path()).unwrap();
        assert!(lut.contains(&LineKey::new("BNT", 2)));
        assert_eq!(lut.len(), 1);
    }

    #[test]
    fn missing_slot_column_is_an_error() {
        // Peds requires the full slot set; this header only has the adult
        // columns.
        let file = write_named("identifier,test_no,raw,ss,percentile,notes\n", ".csv");
        let err = Lut::from_delimited_path(Department::Peds, file.path()).unwrap_err();
        assert!(matches!(err, LutError::MissingColumn { column, .. } if column == "sign"));
    }

    #[test]
    fn bad_test_no_is_an_error() {
        let file = write_named(
            "identifier,test_no,raw,ss,percentile,notes\nBNT,one,,,,\n",
            ".csv",
        );
        let err = Lut::from_delimited_path(Department::Aphasia, file.path()).unwrap_err();
        assert!(matches!(err, LutError::InvalidField { field: "test_no", .. }));
    }

    #[test]
    fn headers_at_level_pads_short_paths() {
        let lut = Lut::from_entries(
            Department::Epilepsy,
            vec![
                (LineKey::new("WAIS-IV | Digit Span | Forward", 1), vec![]),
                (LineKey::new("TOMM", 1), vec![]),
            ],
        );
        assert_eq!(lut.headers_at_level(1), vec!["Digit Span", ""]);
        assert_eq!(lut.headers_at_level(2), vec!["Forward", ""]);
    }
}
