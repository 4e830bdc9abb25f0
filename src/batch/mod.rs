//! Batch processing — request loading, the sequential task runner, and the
//! JSON report the host application reads from stdout.
//!
//! # Flow
//!
//! ```text
//! raw JSON text ─▶ BatchRequest::parse        (BOM strip + serde)
//!                      │
//!                      ▼
//!                  BatchRunner::run           (one task at a time)
//!                      │  normalize ─▶ transcribe ─▶ compare
//!                      ▼
//!                  Vec<TaskReport> ─▶ BatchReport ─▶ one stdout line
//! ```
//!
//! Failures live in two separate domains and never mix: a [`TaskError`] is
//! caught inside the loop and becomes that task's `error` field; a
//! [`BatchError`] short-circuits everything and becomes the top-level
//! `error` of an otherwise empty report.

pub mod report;
pub mod request;
pub mod runner;

pub use report::{BatchReport, TaskOutcome, TaskReport};
pub use request::{BatchError, BatchRequest, Task};
pub use runner::{BatchRunner, TaskError};
