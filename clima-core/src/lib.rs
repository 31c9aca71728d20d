//! Core types for a single-location daily climate record and the yearly
//! climate indices derived from it.
//!
//! Records are immutable once parsed; everything downstream only reads them.

pub mod annual;
pub mod error;
pub mod observation;
pub mod year_range;

pub use annual::AnnualIndexSet;
pub use error::ParseError;
pub use observation::{DailyField, DailyObservation, DataQuality};
pub use year_range::YearRange;

/// Anything that can be bucketed by calendar year.
pub trait YearKeyed {
    fn year(&self) -> i32;
}

impl YearKeyed for DailyObservation {
    fn year(&self) -> i32 {
        clima_utils::dates::year_of(&self.date)
    }
}

impl YearKeyed for AnnualIndexSet {
    fn year(&self) -> i32 {
        self.year
    }
}
