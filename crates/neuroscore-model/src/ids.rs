//! Line identities: the hierarchical label path and its occurrence key.

use std::fmt;

/// Separator between ancestor labels in a flattened identifier.
pub const PATH_SEPARATOR: &str = " | ";

/// A fully-qualified line identifier: the ordered ancestor labels from the
/// root test name down to the line's own label, flattened with
/// [`PATH_SEPARATOR`].
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Identifier(String);

impl Identifier {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Join a label stack, root first.
    pub fn from_stack(stack: &[String]) -> Self {
        Self(stack.join(PATH_SEPARATOR))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The ancestor labels, root first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(PATH_SEPARATOR)
    }

    /// The root test label (first path segment).
    pub fn root(&self) -> &str {
        self.0.split(PATH_SEPARATOR).next().unwrap_or("")
    }

    /// True when the identifier names a root test line (no separator).
    pub fn is_root(&self) -> bool {
        !self.0.contains(PATH_SEPARATOR)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The join key for all LUT lookups: an identifier together with the 1-based
/// occurrence index of its root test within the worksheet.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LineKey {
    pub identifier: Identifier,
    pub test_no: u32,
}

impl LineKey {
    pub fn new(identifier: impl Into<Identifier>, test_no: u32) -> Self {
        Self {
            identifier: identifier.into(),
            test_no,
        }
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Render a 1-based column index as a spreadsheet column letter (1 -> A,
/// 26 -> Z, 27 -> AA).
pub fn column_letter(col: u32) -> String {
    debug_assert!(col >= 1);
    let mut n = col;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(b'A' + rem);
        n = (n - 1) / 26;
    }
    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}
