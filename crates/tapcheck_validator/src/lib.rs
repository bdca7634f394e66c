//! # tapcheck validator
//!
//! Validation engine for water-tap records. This crate checks a
//! [`DataSet`](tapcheck_core::DataSet) against a [`Schema`](tapcheck_core::Schema)
//! in two modes:
//!
//! - Row-wise: walks each record recursively with exact type matching
//! - Batch: drops records without the key field, then checks every column
//!   with coercion, counting all failures instead of stopping at the first
//!
//! ## Example
//!
//! ```rust
//! use tapcheck_core::{DataSet, ValidationContext, ValidationMode, water_tap_schema};
//! use tapcheck_validator::DataValidator;
//!
//! let validator = DataValidator::new();
//! let dataset = DataSet::empty();
//! let context = ValidationContext::new().with_source("water_test");
//!
//! for result in validator.validate_with_data(
//!     &water_tap_schema(),
//!     &dataset,
//!     &context,
//!     ValidationMode::Batch,
//! ) {
//!     println!("{}: {} errors", result.mode, result.outcome.error_count);
//! }
//! ```

mod batch;
pub mod coerce;
mod engine;
mod error;
mod row;
mod table;

pub use batch::*;
pub use engine::*;
pub use error::*;
pub use row::*;
pub use table::*;
