//! Funnel and pipeline reporting.
//!
//! Pure formulas and report shapes. Counting happens in the data layer; the
//! functions here turn counts into rates, ratios and time series.

pub mod error;
pub mod service;
pub mod types;


pub use error::ReportError;
pub use service::ReportingService;
pub use types::*;
