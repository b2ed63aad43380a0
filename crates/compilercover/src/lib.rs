//! compilercover: statement coverage for the Go compiler source tree
//!
//! Rewrites every eligible file under `cmd/compile` with an external
//! statement instrumentor (`go tool cover`), then generates one driver file
//! that imports each instrumented package, registers its counters at init
//! time, and appends a merged report to a shared output file at exit.
//!
//! ## Architecture
//!
//! ```text
//! Walker ──▶ EligibilityFilter ──▶ Instrumentor ──▶ TraversalContext
//!                                                     │
//!                                      driver::render ◀┘ ──▶ cover.go
//! ```
//!
//! [`CoverageRegistry`] implements the driver's runtime semantics for Rust
//! hosts.
//!
//! ## Example
//!
//! ```no_run
//! use compilercover::{instrument_tree, CoverConfig};
//! use std::path::Path;
//!
//! let summary = instrument_tree(Path::new("go/src"), &CoverConfig::default())?;
//! println!("{} files instrumented", summary.files());
//! # Ok::<(), compilercover::CoverError>(())
//! ```

#![warn(missing_docs)]

pub mod block;
pub mod config;
pub mod driver;
pub mod filter;
pub mod instrumentor;
pub mod pipeline;
pub mod registration;
pub mod registry;
mod result;
pub mod unit;
pub mod walker;

pub use block::{CoverageBlock, ProfileLine};
pub use config::{CoverConfig, CoverMode};
pub use driver::{render, write_driver, DriverDocument, DriverSettings};
pub use filter::{EligibilityFilter, Rejection, Verdict};
pub use instrumentor::{CoverTool, DryRun, Instrumentor};
pub use pipeline::{instrument_tree, instrument_tree_with, RunSummary};
pub use registration::{ImportSet, RegistrationStatement};
pub use registry::{
    check_layout, new_counters, CoverageRegistry, Counters, FlushGuard, REPORT_FAILURE_STATUS,
};
pub use result::{CoverError, CoverResult};
pub use unit::{CoverageVariableId, SourceUnit};
pub use walker::{SurveyEntry, TraversalContext, Walker};
