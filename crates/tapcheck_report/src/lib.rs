//! # tapcheck report
//!
//! Turns validation outcomes into per-source reports and writes them out:
//!
//! - a one-row summary CSV (`Database,Errors,Warnings,Unexpected Types`)
//! - a failure CSV with one row per failure case
//! - a dated text report with counts, failures and descriptive statistics
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::Local;
//! use tapcheck_report::{Report, ReportPaths, persist};
//!
//! let report = Report::unavailable("water_prod", Local::now().date_naive(), "offline");
//! let paths = ReportPaths {
//!     summary_dir: ".".into(),
//!     output_dir: "validation_results".into(),
//!     label: "firebase_db".to_string(),
//! };
//! persist(&report, &paths).unwrap();
//! ```

mod error;
mod report;
mod stats;
mod writer;

pub use error::*;
pub use report::*;
pub use stats::*;
pub use writer::*;
