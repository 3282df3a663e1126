//! Error types for the Cadence engine.
//!
//! This crate provides the foundation error types used throughout the Cadence workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! Scene-fatal conditions (`AlignmentError`, `ScheduleError`, `FootprintError`) are
//! isolated per scene by the run manager and never abort sibling scenes. The remaining
//! types describe run-level problems such as an invalid lesson plan or an unwritable
//! artifact directory.
//!
//! # Examples
//!
//! ```
//! use cadence_error::{CadenceResult, ConfigError};
//!
//! fn load() -> CadenceResult<u32> {
//!     Err(ConfigError::new("engine.max_concurrency", "must be at least 1"))?
//! }
//!
//! match load() {
//!     Ok(value) => println!("Got: {}", value),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod alignment;
mod config;
mod error;
mod footprint;
mod json;
mod plan;
mod run;
mod schedule;
mod storage;

pub use alignment::{AlignmentError, AlignmentErrorKind};
pub use config::ConfigError;
pub use error::{CadenceError, CadenceErrorKind, CadenceResult};
pub use footprint::{FootprintError, FootprintErrorKind};
pub use json::JsonError;
pub use plan::{PlanError, PlanErrorKind};
pub use run::{RunError, RunErrorKind};
pub use schedule::{ScheduleError, ScheduleErrorKind};
pub use storage::{StorageError, StorageErrorKind};
