//! Lookup-table and reference-table loading.
//!
//! Tables are loaded once, explicitly, and passed by reference into the
//! extraction layer; there are no process-wide singletons.

pub mod error;
pub mod init;
pub mod lut;
pub mod psychometric;

pub use error::{LutError, Result};
pub use init::{LutSeed, initialize_lut};
pub use lut::{Lut, SlotRow};
pub use psychometric::{PsychometricRow, PsychometricTable, ScoreBands};
