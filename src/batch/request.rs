//! Batch request parsing.
//!
//! The host serialises the task list as JSON with camelCase keys:
//!
//! ```json
//! { "tasks": [ { "id": "0001", "audioPath": "clips/0001.wav",
//!                "scriptText": "expected line" } ] }
//! ```
//!
//! The text may start with a UTF-8 byte-order mark (the host writes the temp
//! file with a BOM-emitting encoder); it is stripped before parsing.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// BatchError
// ---------------------------------------------------------------------------

/// Batch-level failure: the request never became a task list, so the whole
/// run aborts with zero results.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The request text is not valid JSON or lacks the `tasks` field.
    #[error("{0}")]
    MalformedRequest(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Task / BatchRequest
// ---------------------------------------------------------------------------

/// One unit of work: an audio file and the script text it should contain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Caller-assigned identifier, echoed verbatim into the result.
    pub id: String,
    /// Path of the source audio file.
    pub audio_path: PathBuf,
    /// Expected script text; may be empty or multi-line.
    pub script_text: String,
}

/// The full ordered task list of one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub tasks: Vec<Task>,
}

impl BatchRequest {
    /// Parse the raw request text, tolerating leading byte-order marks.
    pub fn parse(raw: &str) -> Result<Self, BatchError> {
        let raw = raw.trim_start_matches('\u{feff}');
        Ok(serde_json::from_str(raw)?)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
