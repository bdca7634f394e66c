//! # tapcheck core
//!
//! Core data structures for validating water tap point-of-interest records.
//!
//! ## Key Concepts
//!
//! - **Schema**: ordered [`FieldSpec`]s with type, required, nullable and
//!   coercion flags, plus a strict/permissive switch for unknown keys
//! - **Record / DataSet**: key/value maps as returned by a source, each
//!   remembering its position in the source sequence
//! - **ValidationOutcome**: error, warning and unexpected-type counts plus
//!   every failure case found in one run
//! - **RunConfig**: sources, output locations and statistics columns
//!
//! ## Example
//!
//! ```rust
//! use tapcheck_core::{water_tap_schema, FieldType};
//!
//! let schema = water_tap_schema();
//! assert!(schema.strict);
//! assert_eq!(schema.field("lat").map(|f| f.field_type), Some(FieldType::Float));
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod record;
pub mod schema;
pub mod validator;
pub mod water;

pub use builder::*;
pub use config::*;
pub use error::*;
pub use record::*;
pub use schema::*;
pub use validator::*;
pub use water::*;
