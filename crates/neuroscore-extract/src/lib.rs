//! Score extraction for neuroscore workbooks: value normalization, the
//! per-line classifier, discrepancy accumulation, and the workbook parser
//! facade that ties them to the resolver and lookup table.

pub mod equivalent;
pub mod error;
pub mod extract;
pub mod facade;
pub mod nan;
pub mod scores;

pub use equivalent::{EquivalentValue, parse_equivalent};
pub use error::{ExtractError, Result};
pub use extract::{Extraction, ExtractionResult, extract};
pub use facade::{Header, Refs, TimepointExtraction, WorkbookParser, extraction_values};
pub use nan::NanRules;
pub use scores::{ClassifiedSs, SsKind, classify_ss};
