//! Host-runner lifecycle adapter.
//!
//! The runner calls [`Reporter::on_init`] at session start and
//! [`Reporter::on_finished`] once with the complete result tree. Nothing here
//! returns an error to the runner: failures are logged, and a failed write
//! never fails the test session.

use std::path::{Path, PathBuf};

use crate::aggregator::Aggregator;
use crate::config::ReporterOptions;
use crate::model::CtrfReport;
use crate::report::ReportWriter;
use crate::tree::RunnerOutput;

pub const REPORTER_NAME: &str = "ctrf-json-reporter";

/// Callbacks a host runner drives.
pub trait Reporter {
    fn on_init(&mut self);

    fn on_finished(&mut self, output: RunnerOutput);
}

/// Owns one session: a fresh [`Aggregator`] and the [`ReportWriter`] it hands off to.
pub struct CtrfReporter {
    aggregator: Option<Aggregator>,
    writer: ReportWriter,
    report: Option<CtrfReport>,
    written: Option<PathBuf>,
}

impl CtrfReporter {
    /// Creates the output directory up front; a failure there is logged and
    /// retried by the final write.
    pub fn new(options: &ReporterOptions) -> Self {
        let writer = ReportWriter::from_options(options);
        if let Err(e) = writer.ensure_dir() {
            tracing::warn!(
                reporter = REPORTER_NAME,
                error = %e,
                "could not create output directory"
            );
        }
        Self {
            aggregator: Some(Aggregator::new(options)),
            writer,
            report: None,
            written: None,
        }
    }

    /// Finished report, available after [`Reporter::on_finished`].
    pub fn report(&self) -> Option<&CtrfReport> {
        self.report.as_ref()
    }

    /// Where the report landed, if the write succeeded.
    pub fn written_path(&self) -> Option<&Path> {
        self.written.as_deref()
    }

    pub fn output_path(&self) -> PathBuf {
        self.writer.path()
    }
}

impl Reporter for CtrfReporter {
    fn on_init(&mut self) {
        match self.aggregator.as_mut() {
            Some(agg) => agg.begin(),
            None => tracing::warn!(
                reporter = REPORTER_NAME,
                "on_init after session finished, ignoring"
            ),
        }
    }

    fn on_finished(&mut self, output: RunnerOutput) {
        let Some(mut agg) = self.aggregator.take() else {
            tracing::warn!(reporter = REPORTER_NAME, "session already finished, ignoring");
            return;
        };

        if !output.errors.is_empty() {
            tracing::warn!(
                reporter = REPORTER_NAME,
                count = output.errors.len(),
                "runner reported unhandled errors"
            );
            for err in &output.errors {
                tracing::debug!(reporter = REPORTER_NAME, error = %err, "runner error");
            }
        }

        agg.ingest_values(output.files);
        agg.finish();
        let report = agg.into_report();

        self.written = self.writer.persist(&report);
        self.report = Some(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options_in(dir: &Path) -> ReporterOptions {
        ReporterOptions {
            output_dir: dir.join("ctrf"),
            ..ReporterOptions::default()
        }
    }

    #[test]
    fn construction_creates_output_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let _reporter = CtrfReporter::new(&options_in(tmp.path()));
        assert!(tmp.path().join("ctrf").is_dir());
    }

    #[test]
    fn full_lifecycle_writes_report() {
        let tmp = tempfile::tempdir().unwrap();
        let mut reporter = CtrfReporter::new(&options_in(tmp.path()));
        reporter.on_init();
        reporter.on_finished(RunnerOutput {
            files: vec![json!({
                "type": "file",
                "name": "math.test.ts",
                "tasks": [{"type": "test", "name": "adds", "result": {"state": "pass", "duration": 1}}]
            })],
            errors: vec![json!("unhandled rejection")],
        });

        let path = reporter.written_path().unwrap();
        assert_eq!(path, tmp.path().join("ctrf/report.json"));
        let report = reporter.report().unwrap();
        assert_eq!(report.summary().passed, 1);
        assert!(report.summary().start <= report.summary().stop);
    }

    #[test]
    fn second_finish_is_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        let mut reporter = CtrfReporter::new(&options_in(tmp.path()));
        reporter.on_init();
        reporter.on_finished(RunnerOutput {
            files: vec![json!({"type": "test", "name": "a", "result": {"state": "pass"}})],
            errors: vec![],
        });
        reporter.on_finished(RunnerOutput {
            files: vec![json!({"type": "test", "name": "b", "result": {"state": "fail"}})],
            errors: vec![],
        });

        let report = reporter.report().unwrap();
        assert_eq!(report.summary().tests, 1);
        assert_eq!(report.tests()[0].name, "a");
    }

    #[test]
    fn write_failure_does_not_panic() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let options = ReporterOptions {
            output_dir: blocker,
            ..ReporterOptions::default()
        };

        let mut reporter = CtrfReporter::new(&options);
        reporter.on_init();
        reporter.on_finished(RunnerOutput::default());

        assert!(reporter.written_path().is_none());
        assert_eq!(reporter.report().unwrap().summary().tests, 0);
    }
}
