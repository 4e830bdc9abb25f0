//! Command-line entry point.
//!
//! Invoked by the host application as:
//!
//! ```text
//! script-check <engine> <language> <model> <filepath>
//! ```
//!
//! where `filepath` names a UTF-8 (optionally BOM-prefixed) JSON file with
//! the task list.  The contract with the host is strict: **exactly one line
//! of JSON on stdout, always** — argument errors, unreadable files, and
//! malformed batches all degrade to a zero-result report with a top-level
//! error string.  Progress and diagnostics go to the log on stderr.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::Parser;

use script_check::batch::{BatchReport, BatchRequest, BatchRunner};
use script_check::config::AppConfig;

/// Top-level error for missing/extra positional arguments.  Fixed wording —
/// the host matches on it.
const INVALID_ARGS: &str = "Invalid arguments. Expected: engine, language, model, filepath";

/// Verify audio recordings against their expected script text.
#[derive(Parser, Debug)]
#[command(name = "script-check")]
struct Cli {
    /// Recognition engine: whisper, google, or sphinx.
    engine: String,

    /// Language code passed to the engine (e.g. "en", "ja", "en-US").
    language: String,

    /// Model name (whisper only; ignored by google and sphinx).
    model: String,

    /// Path to the batch request JSON file.
    filepath: PathBuf,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let report = match parse_args(std::env::args_os()) {
        Ok(cli) => build_report(&cli),
        Err(report) => report,
    };
    println!("{}", report.to_json_line());
}

/// Map the argument list to either a parsed [`Cli`] or the fixed-wording
/// failure report the host expects on bad arguments.
fn parse_args<I, T>(args: I) -> Result<Cli, BatchReport>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        // Help/version are for a human at a terminal, not the host — let
        // clap print them and exit.
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit();
        }
        Err(_) => Err(BatchReport::failure(INVALID_ARGS)),
    }
}

/// Produce the one report this invocation will print, whatever happens.
fn build_report(cli: &Cli) -> BatchReport {
    let raw = match std::fs::read_to_string(&cli.filepath) {
        Ok(raw) => raw,
        Err(e) => {
            return BatchReport::failure(format!(
                "An unexpected error occurred: failed to read {}: {e}",
                cli.filepath.display()
            ));
        }
    };

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    match BatchRequest::parse(&raw) {
        Ok(request) => {
            let runner =
                BatchRunner::from_selection(&cli.engine, &cli.language, &cli.model, &config);
            BatchReport::completed(runner.run(&request))
        }
        Err(e) => BatchReport::failure(format!("Batch process failed: {e}")),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn cli(filepath: PathBuf) -> Cli {
        Cli {
            engine: "whisper".into(),
            language: "en".into(),
            model: "base".into(),
            filepath,
        }
    }

    #[test]
    fn missing_arguments_yield_the_fixed_error_report() {
        let report = parse_args(["script-check", "whisper"]).unwrap_err();
        assert!(report.results.is_empty());
        assert_eq!(report.error.as_deref(), Some(INVALID_ARGS));
    }

    #[test]
    fn extra_arguments_yield_the_fixed_error_report() {
        let report =
            parse_args(["script-check", "whisper", "en", "base", "t.json", "surplus"])
                .unwrap_err();
        assert_eq!(report.error.as_deref(), Some(INVALID_ARGS));
    }

    #[test]
    fn four_positional_arguments_parse() {
        let cli = parse_args(["script-check", "google", "ja", "-", "tasks.json"])
            .expect("parse");
        assert_eq!(cli.engine, "google");
        assert_eq!(cli.language, "ja");
        assert_eq!(cli.model, "-");
        assert_eq!(cli.filepath, PathBuf::from("tasks.json"));
    }

    #[test]
    fn unreadable_request_file_reports_unexpected_error() {
        let dir = tempdir().expect("temp dir");
        let report = build_report(&cli(dir.path().join("missing.json")));

        assert!(report.results.is_empty());
        let error = report.error.expect("top-level error");
        assert!(
            error.starts_with("An unexpected error occurred"),
            "error: {error}"
        );
    }

    #[test]
    fn malformed_request_file_reports_batch_failure() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("tasks.json");
        fs::write(&path, "not json at all").expect("write request");

        let report = build_report(&cli(path));
        assert!(report.results.is_empty());
        let error = report.error.expect("top-level error");
        assert!(error.starts_with("Batch process failed: "), "error: {error}");
    }

    #[test]
    fn empty_batch_reports_zero_results_without_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("tasks.json");
        fs::write(&path, r#"{"tasks": []}"#).expect("write request");

        let report = build_report(&cli(path));
        assert!(report.results.is_empty());
        assert!(report.error.is_none());
    }

    #[test]
    fn every_outcome_serialises_to_a_single_line() {
        let dir = tempdir().expect("temp dir");
        let bad = dir.path().join("missing.json");
        let malformed = dir.path().join("bad.json");
        fs::write(&malformed, "{").expect("write request");

        let reports = [
            parse_args(["script-check"]).unwrap_err(),
            build_report(&cli(bad)),
            build_report(&cli(malformed)),
        ];
        for report in &reports {
            let line = report.to_json_line();
            assert!(!line.contains('\n'), "line: {line}");
            assert!(serde_json::from_str::<serde_json::Value>(&line).is_ok());
        }
    }
}
