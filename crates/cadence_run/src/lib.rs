//! Run orchestration for Cadence.
//!
//! A run takes one lesson plan through the timeline engine:
//!
//! 1. **Identity**: [`RunIdentity`] hashes the lesson, its style tokens, and the
//!    provider configuration; the short hash names the artifact directory
//! 2. **Dispatch**: [`RunManager`] runs each scene as an independent blocking task,
//!    bounded by the configured concurrency limit and stoppable through a
//!    [`CancellationToken`]
//! 3. **Join**: reports are collected by scene index, so output order is the plan
//!    order regardless of completion order
//! 4. **Verdict**: [`Verdict::evaluate`] fails the run on the first fatal scene
//!    condition; `report.json` is always written, `cues.json` only on success
//!
//! Configuration is layered by [`CadenceConfig::load`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod identity;
mod manager;
mod report;

pub use config::{CadenceConfig, PathsConfig};
pub use identity::RunIdentity;
pub use manager::{RunManager, RunOutcome};
pub use report::{CueEntry, CueFile, RunRecord, RunReport, SceneCues, TimelineFile, Verdict};
pub use tokio_util::sync::CancellationToken;
