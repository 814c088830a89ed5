//! Pediatric equivalent-column grammar.
//!
//! The equivalent column mixes several textual shapes: censored scores
//! (`<3`, `>16`), grade ranges (`2-4`), age equivalents in years:months
//! (`4:6`), and age ranges (`4:6-5:0`). Ages convert to a month count;
//! sign tokens and plain ranges stay textual and land in the sign slot.

use std::sync::LazyLock;

use regex::Regex;

static SIGN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[<>]\s*\S").expect("invalid sign pattern"));

static RANGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+-\d+$").expect("invalid range pattern"));

static AGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(\d+)$").expect("invalid age pattern"));

static AGE_RANGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(\d+)-(\d+):(\d+)$").expect("invalid age range pattern"));

/// A parsed equivalent-column value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquivalentValue {
    /// Censored or ranged score kept textual, destined for the sign slot.
    Sign(String),
    /// A single age equivalent, in months.
    Age(u32),
    /// An age range, both endpoints in months.
    AgeRange { low: u32, high: u32 },
    /// Anything the grammar does not recognize.
    Unparsed(String),
}

fn months(years: &str, months: &str) -> Option<u32> {
    let y: u32 = years.parse().ok()?;
    let m: u32 = months.parse().ok()?;
    Some(y * 12 + m)
}

/// Parse one equivalent-column cell.
pub fn parse_equivalent(text: &str) -> EquivalentValue {
    let trimmed = text.trim();

    if SIGN_PATTERN.is_match(trimmed) || RANGE_PATTERN.is_match(trimmed) {
        return EquivalentValue::Sign(trimmed.to_string());
    }

    if let Some(captures) = AGE_RANGE_PATTERN.captures(trimmed) {
        if let (Some(low), Some(high)) = (
            months(&captures[1], &captures[2]),
            months(&captures[3], &captures[4]),
        ) {
            return EquivalentValue::AgeRange { low, high };
        }
    }

    if let Some(captures) = AGE_PATTERN.captures(trimmed) {
        if let Some(age) = months(&captures[1], &captures[2]) {
            return EquivalentValue::Age(age);
        }
    }

    EquivalentValue::Unparsed(trimmed.to_string())
}
