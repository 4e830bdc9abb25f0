//! Sequential batch runner.
//!
//! One task at a time: normalize the audio, run the engine, compare the
//! transcript against the script.  Every task yields exactly one
//! [`TaskReport`] in input order; a failing task is recorded and the loop
//! moves on.  The temp WAV guard is scoped to the task's iteration, so the
//! converted artifact is gone before the next task starts — and gone even
//! when recognition errors out.

use crate::audio;
use crate::compare::{similarity_ratio, unified_diff};
use crate::config::AppConfig;
use crate::engine::{build_engine, EngineError, EngineKind, SpeechEngine};

use super::report::{TaskOutcome, TaskReport};
use super::request::{BatchRequest, Task};

use thiserror::Error;

// ---------------------------------------------------------------------------
// TaskError
// ---------------------------------------------------------------------------

/// Per-task failure: caught inside the loop, never aborts the batch.
#[derive(Debug, Error)]
pub enum TaskError {
    /// Audio conversion failed (open, decode, or temp-wav write).
    #[error(transparent)]
    Audio(#[from] audio::AudioError),

    /// Engine selection, construction, or recognition failed.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

// ---------------------------------------------------------------------------
// BatchRunner
// ---------------------------------------------------------------------------

/// Drives a batch against one engine instance.
///
/// The engine is built once, up front.  When selection or construction
/// fails, the stored error is replayed into every task — the batch still
/// produces a full, ordered result list, and the filesystem is never
/// touched for those tasks.
pub struct BatchRunner {
    engine: Result<Box<dyn SpeechEngine>, EngineError>,
}

impl BatchRunner {
    /// Wrap an already-built (or already-failed) engine.
    pub fn new(engine: Result<Box<dyn SpeechEngine>, EngineError>) -> Self {
        Self { engine }
    }

    /// Resolve the selector and build the engine from config.
    pub fn from_selection(
        engine: &str,
        language: &str,
        model: &str,
        config: &AppConfig,
    ) -> Self {
        let engine = engine
            .parse::<EngineKind>()
            .and_then(|kind| build_engine(kind, language, model, config));
        Self::new(engine)
    }

    /// Process every task in order, returning one report per task.
    pub fn run(&self, request: &BatchRequest) -> Vec<TaskReport> {
        let total = request.tasks.len();
        log::info!("Total tasks received: {total}");

        request
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let name = task
                    .audio_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| task.audio_path.display().to_string());
                log::info!("Processing {}/{total}: {name}", i + 1);

                let report = self.process(task);
                if let TaskOutcome::Failed { message } = &report.outcome {
                    log::error!("Error processing task {}: {message}", task.id);
                }
                report
            })
            .collect()
    }

    /// Run one task, converting any [`TaskError`] into a `Failed` outcome.
    fn process(&self, task: &Task) -> TaskReport {
        let outcome = match self.try_process(task) {
            Ok(outcome) => outcome,
            Err(e) => TaskOutcome::Failed {
                message: e.to_string(),
            },
        };
        TaskReport {
            id: task.id.clone(),
            script_text: task.script_text.clone(),
            outcome,
        }
    }

    fn try_process(&self, task: &Task) -> Result<TaskOutcome, TaskError> {
        let engine = self.engine.as_ref().map_err(|e| e.clone())?;

        // The guard deletes the temp wav when it leaves this scope, on the
        // error paths included.
        let wav = audio::normalize(&task.audio_path)?;
        let recognized = engine.transcribe(&wav)?;

        let similarity = similarity_ratio(&task.script_text, &recognized);
        let diff = unified_diff(&task.script_text, &recognized);

        Ok(TaskOutcome::Compared {
            recognized,
            similarity,
            diff,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockEngine;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    fn write_wav(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).expect("create wav");
        for i in 0..1_600_i32 {
            writer
                .write_sample(((i % 64) - 32) as i16 * 256)
                .expect("write sample");
        }
        writer.finalize().expect("finalize wav");
        path
    }

    fn task(id: &str, audio_path: PathBuf, script: &str) -> Task {
        Task {
            id: id.into(),
            audio_path,
            script_text: script.into(),
        }
    }

    fn runner_with(engine: MockEngine) -> BatchRunner {
        BatchRunner::new(Ok(Box::new(engine)))
    }

    #[test]
    fn one_report_per_task_in_order() {
        let dir = tempdir().expect("temp dir");
        let a = write_wav(dir.path(), "a.wav");
        let b = write_wav(dir.path(), "b.wav");

        let request = BatchRequest {
            tasks: vec![
                task("first", a, "hello"),
                task("second", b, "world"),
            ],
        };

        let reports = runner_with(MockEngine::ok("hello")).run(&request);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].id, "first");
        assert_eq!(reports[1].id, "second");
    }

    #[test]
    fn matching_transcript_scores_one_with_empty_diff() {
        let dir = tempdir().expect("temp dir");
        let a = write_wav(dir.path(), "a.wav");

        let request = BatchRequest {
            tasks: vec![task("t", a, "hello world")],
        };
        let reports = runner_with(MockEngine::ok("hello world")).run(&request);

        match &reports[0].outcome {
            TaskOutcome::Compared {
                recognized,
                similarity,
                diff,
            } => {
                assert_eq!(recognized, "hello world");
                assert_eq!(*similarity, 1.0);
                assert!(diff.is_empty());
            }
            other => panic!("expected Compared, got {other:?}"),
        }
    }

    #[test]
    fn empty_script_and_empty_transcript_are_a_perfect_match() {
        let dir = tempdir().expect("temp dir");
        let a = write_wav(dir.path(), "a.wav");

        let request = BatchRequest {
            tasks: vec![task("t", a, "")],
        };
        let reports = runner_with(MockEngine::ok("")).run(&request);

        match &reports[0].outcome {
            TaskOutcome::Compared {
                similarity, diff, ..
            } => {
                assert_eq!(*similarity, 1.0);
                assert!(diff.is_empty());
            }
            other => panic!("expected Compared, got {other:?}"),
        }
    }

    #[test]
    fn missing_audio_fails_that_task_only() {
        let dir = tempdir().expect("temp dir");
        let good = write_wav(dir.path(), "good.wav");

        let request = BatchRequest {
            tasks: vec![
                task("bad", dir.path().join("missing.wav"), "text"),
                task("good", good, "text"),
            ],
        };
        let reports = runner_with(MockEngine::ok("text")).run(&request);

        assert_eq!(reports.len(), 2);
        assert!(matches!(reports[0].outcome, TaskOutcome::Failed { .. }));
        assert!(matches!(reports[1].outcome, TaskOutcome::Compared { .. }));
    }

    #[test]
    fn engine_failure_is_recorded_per_task() {
        let dir = tempdir().expect("temp dir");
        let a = write_wav(dir.path(), "a.wav");
        let b = write_wav(dir.path(), "b.wav");

        let request = BatchRequest {
            tasks: vec![task("t1", a, "x"), task("t2", b, "y")],
        };
        let reports = runner_with(MockEngine::err(EngineError::Recognition("boom".into())))
            .run(&request);

        for report in &reports {
            match &report.outcome {
                TaskOutcome::Failed { message } => assert!(message.contains("boom")),
                other => panic!("expected Failed, got {other:?}"),
            }
        }
    }

    #[test]
    fn unsupported_selector_fails_every_task_without_touching_audio() {
        let dir = tempdir().expect("temp dir");
        // Deliberately no audio file on disk — the runner must not need one.
        let request = BatchRequest {
            tasks: vec![
                task("t1", dir.path().join("a.wav"), "x"),
                task("t2", dir.path().join("b.wav"), "y"),
            ],
        };

        let runner = BatchRunner::new(Err(EngineError::Unsupported("azure".into())));
        let reports = runner.run(&request);

        assert_eq!(reports.len(), 2);
        for report in &reports {
            match &report.outcome {
                TaskOutcome::Failed { message } => {
                    assert_eq!(message, "Unsupported engine: azure");
                }
                other => panic!("expected Failed, got {other:?}"),
            }
        }
        // No temp wav derivation may have happened.
        assert!(!dir.path().join("a_temp.wav").exists());
        assert!(!dir.path().join("b_temp.wav").exists());
    }

    #[test]
    fn temp_wavs_are_gone_after_the_run() {
        let dir = tempdir().expect("temp dir");
        let a = write_wav(dir.path(), "a.wav");
        let b = write_wav(dir.path(), "b.wav");

        let request = BatchRequest {
            tasks: vec![task("ok", a, "x"), task("fail", b, "y")],
        };

        let reports = runner_with(MockEngine::ok("x")).run(&request);
        assert_eq!(reports.len(), 2);
        assert!(!dir.path().join("a_temp.wav").exists());
        assert!(!dir.path().join("b_temp.wav").exists());
    }

    #[test]
    fn empty_batch_yields_empty_report_list() {
        let request = BatchRequest { tasks: vec![] };
        let reports = runner_with(MockEngine::ok("x")).run(&request);
        assert!(reports.is_empty());
    }
}
