//! Score-scale classification for the pediatric `ss` column.
//!
//! Pediatric instruments report standard scores (mean 100), scaled scores
//! (mean 10), and T scores (mean 50) in the same physical column. The scale
//! is recovered from the value itself: an explicit `T` prefix wins, then
//! closeness to the psychometric reference bands for the line's percentile,
//! then coarse numeric ranges when no percentile is available. A value that
//! matches nothing is a hard error; guessing here corrupts downstream data
//! silently.

use std::sync::LazyLock;

use regex::Regex;

use neuroscore_lut::PsychometricTable;
use neuroscore_model::Value;

static T_PREFIX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^T\s*(\d+(?:\.\d+)?)$").expect("invalid T-prefix pattern"));

/// Closeness tolerance per scale, matched to each scale's granularity.
const STANDARD_TOLERANCE: f64 = 3.0;
const SCALED_TOLERANCE: f64 = 1.0;
const T_TOLERANCE: f64 = 2.0;

/// Coarse value ranges used when no percentile is available. Scaled scores
/// run 1-19; T scores cluster in the 20s and 30s at the low percentiles
/// where they matter; standard scores span 40-160.
const SCALED_RANGE: (f64, f64) = (1.0, 19.0);
const T_RANGE: (f64, f64) = (20.0, 39.0);
const STANDARD_RANGE: (f64, f64) = (40.0, 160.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SsKind {
    Standard,
    Scaled,
    TScore,
}

/// A score with its recovered scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedSs {
    pub kind: SsKind,
    pub value: f64,
}

/// Whether any candidate lies within `tolerance` of `value`.
fn close_any(value: f64, candidates: &[f64], tolerance: f64) -> bool {
    candidates
        .iter()
        .any(|candidate| (value - candidate).abs() < tolerance)
}

fn in_range(value: f64, (low, high): (f64, f64)) -> bool {
    value >= low && value <= high
}

/// Classify one `ss` cell. `percentile` is the value of the line's
/// percentile column, when present. Returns None only for values no rule
/// covers; the caller turns that into a classification error with the
/// cell's address attached.
pub fn classify_ss(
    value: &Value,
    percentile: Option<f64>,
    table: &PsychometricTable,
) -> Option<ClassifiedSs> {
    // An explicit T prefix always wins.
    let numeric = match value {
        Value::Text(text) => {
            let trimmed = text.trim();
            if let Some(captures) = T_PREFIX_PATTERN.captures(trimmed) {
                let parsed: f64 = captures[1].parse().ok()?;
                return Some(ClassifiedSs {
                    kind: SsKind::TScore,
                    value: parsed,
                });
            }
            // Text-formatted numbers happen when a cell style leaks.
            trimmed.parse().ok()?
        }
        _ => value.as_number()?,
    };

    if let Some(percentile) = percentile {
        let bands = table.bands(percentile);
        if !bands.is_empty() {
            if close_any(numeric, &bands.scaled, SCALED_TOLERANCE) {
                return Some(ClassifiedSs {
                    kind: SsKind::Scaled,
                    value: numeric,
                });
            }
            if close_any(numeric, &bands.t, T_TOLERANCE) {
                return Some(ClassifiedSs {
                    kind: SsKind::TScore,
                    value: numeric,
                });
            }
            if close_any(numeric, &bands.standard, STANDARD_TOLERANCE) {
                return Some(ClassifiedSs {
                    kind: SsKind::Standard,
                    value: numeric,
                });
            }
            return None;
        }
        // Percentile absent from the reference table: fall through to the
        // range heuristics.
    }

    if in_range(numeric, SCALED_RANGE) {
        return Some(ClassifiedSs {
            kind: SsKind::Scaled,
            value: numeric,
        });
    }
    if in_range(numeric, T_RANGE) {
        return Some(ClassifiedSs {
            kind: SsKind::TScore,
            value: numeric,
        });
    }
    if in_range(numeric, STANDARD_RANGE) {
        return Some(ClassifiedSs {
            kind: SsKind::Standard,
            value: numeric,
        });
    }

    None
}
