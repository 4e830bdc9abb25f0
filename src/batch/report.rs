//! Batch result types and their wire serialization.
//!
//! Internally a task either compared successfully or failed — a tagged
//! [`TaskOutcome`], not a bundle of sentinel fields.  On the wire the host
//! expects a flat record, so serialization maps the two variants onto it:
//!
//! ```json
//! {"id": "t1", "similarity": 0.95, "script_text": "...",
//!  "recognized_text": "...", "diff": ["--- CSV Script", "..."], "error": null}
//! ```
//!
//! A failed task serialises with similarity `0`, empty recognized text,
//! empty diff, and the failure message in `error`.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// TaskOutcome / TaskReport
// ---------------------------------------------------------------------------

/// What happened to a single task.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// Recognition ran and the transcript was compared against the script.
    Compared {
        /// The engine's transcript.
        recognized: String,
        /// Similarity ratio in `[0.0, 1.0]`.
        similarity: f64,
        /// Unified diff lines; empty when the texts match line for line.
        diff: Vec<String>,
    },
    /// Conversion or recognition failed; the batch carried on.
    Failed {
        /// Human-readable failure description.
        message: String,
    },
}

/// Result of one task, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskReport {
    /// Identifier echoed from the request.
    pub id: String,
    /// The expected script text, echoed for the host's display.
    pub script_text: String,
    /// Comparison outcome or failure.
    pub outcome: TaskOutcome,
}

impl Serialize for TaskReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        const EMPTY_DIFF: &[String] = &[];

        let mut record = serializer.serialize_struct("TaskReport", 6)?;
        record.serialize_field("id", &self.id)?;
        match &self.outcome {
            TaskOutcome::Compared {
                recognized,
                similarity,
                diff,
            } => {
                record.serialize_field("similarity", similarity)?;
                record.serialize_field("script_text", &self.script_text)?;
                record.serialize_field("recognized_text", recognized)?;
                record.serialize_field("diff", diff)?;
                record.serialize_field("error", &None::<&str>)?;
            }
            TaskOutcome::Failed { message } => {
                record.serialize_field("similarity", &0.0_f64)?;
                record.serialize_field("script_text", &self.script_text)?;
                record.serialize_field("recognized_text", "")?;
                record.serialize_field("diff", EMPTY_DIFF)?;
                record.serialize_field("error", &Some(message.as_str()))?;
            }
        }
        record.end()
    }
}

// ---------------------------------------------------------------------------
// BatchReport
// ---------------------------------------------------------------------------

/// The single JSON object emitted on stdout.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    /// One entry per task, in request order; empty on batch failure.
    pub results: Vec<TaskReport>,
    /// Set only when the batch as a whole could not run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchReport {
    /// A completed batch — per-task failures live inside `results`.
    pub fn completed(results: Vec<TaskReport>) -> Self {
        Self {
            results,
            error: None,
        }
    }

    /// A batch that never ran: zero results plus a top-level error.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Serialize as the single stdout line.
    ///
    /// Serialization of these types cannot realistically fail, but the
    /// stdout contract allows no panic path — a serializer error degrades
    /// to a hand-built failure object.
    pub fn to_json_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"results": [], "error": "Batch process failed: {e}"}}"#)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn compared(id: &str) -> TaskReport {
        TaskReport {
            id: id.into(),
            script_text: "hello world".into(),
            outcome: TaskOutcome::Compared {
                recognized: "hello word".into(),
                similarity: 20.0 / 21.0,
                diff: vec!["--- CSV Script".into(), "+++ Recognized Audio".into()],
            },
        }
    }

    #[test]
    fn successful_task_serialises_null_error() {
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&compared("t1")).unwrap()).unwrap();

        assert_eq!(json["id"], "t1");
        assert_eq!(json["script_text"], "hello world");
        assert_eq!(json["recognized_text"], "hello word");
        assert!(json["error"].is_null());
        assert_eq!(json["diff"].as_array().unwrap().len(), 2);
        let similarity = json["similarity"].as_f64().unwrap();
        assert!((similarity - 20.0 / 21.0).abs() < 1e-9);
    }

    #[test]
    fn failed_task_serialises_sentinels() {
        let report = TaskReport {
            id: "t2".into(),
            script_text: "expected".into(),
            outcome: TaskOutcome::Failed {
                message: "Unsupported engine: azure".into(),
            },
        };
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&report).unwrap()).unwrap();

        assert_eq!(json["similarity"], 0.0);
        assert_eq!(json["recognized_text"], "");
        assert_eq!(json["diff"], serde_json::json!([]));
        assert_eq!(json["error"], "Unsupported engine: azure");
    }

    #[test]
    fn completed_batch_omits_top_level_error() {
        let line = BatchReport::completed(vec![compared("t1")]).to_json_line();
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(json["results"].as_array().unwrap().len(), 1);
        assert!(json.get("error").is_none(), "line: {line}");
    }

    #[test]
    fn failed_batch_has_empty_results_and_error() {
        let line = BatchReport::failure("Batch process failed: bad JSON").to_json_line();
        let json: serde_json::Value = serde_json::from_str(&line).unwrap();

        assert_eq!(json["results"], serde_json::json!([]));
        assert_eq!(json["error"], "Batch process failed: bad JSON");
    }

    #[test]
    fn json_line_has_no_embedded_newlines() {
        let line = BatchReport::completed(vec![compared("a"), compared("b")]).to_json_line();
        assert!(!line.contains('\n'));
    }

    #[test]
    fn field_order_matches_host_expectation() {
        // The host relies on a stable record layout; keep the field order.
        let line = serde_json::to_string(&compared("t1")).unwrap();
        let id_pos = line.find("\"id\"").unwrap();
        let sim_pos = line.find("\"similarity\"").unwrap();
        let script_pos = line.find("\"script_text\"").unwrap();
        let recog_pos = line.find("\"recognized_text\"").unwrap();
        let diff_pos = line.find("\"diff\"").unwrap();
        let err_pos = line.find("\"error\"").unwrap();
        assert!(id_pos < sim_pos && sim_pos < script_pos);
        assert!(script_pos < recog_pos && recog_pos < diff_pos && diff_pos < err_pos);
    }
}
