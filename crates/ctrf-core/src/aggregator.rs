//! Walks a runner result tree and accumulates a CTRF report.
//!
//! Lifecycle: [`Aggregator::begin`] once, [`Aggregator::ingest`] once with the
//! final tree, [`Aggregator::finish`] once, then [`Aggregator::into_report`].
//! Malformed or unknown nodes are logged and skipped; a partial report is
//! preferred over losing the session.

use crate::config::ReporterOptions;
use crate::failure::extract_failure_details;
use crate::model::{CtrfReport, CtrfTest};
use crate::status::map_status;
use crate::tree::{decode_node, TaskNode, TestTask};

/// Separator between suite names in a test's display name.
pub const NAME_DELIMITER: &str = " > ";

pub struct Aggregator {
    report: CtrfReport,
    minimal: bool,
    test_type: String,
}

/// Inherited context for a pending node.
struct Frame<'a> {
    node: &'a TaskNode,
    /// Innermost named ancestor suite, as an index into [`Segments`].
    prefix: Option<usize>,
    file: Option<&'a str>,
}

/// Ancestor suite names stored once per suite; children share their
/// parent's entry instead of copying the whole path.
#[derive(Default)]
struct Segments<'a> {
    entries: Vec<(Option<usize>, &'a str)>,
}

impl<'a> Segments<'a> {
    fn push(&mut self, parent: Option<usize>, name: &'a str) -> usize {
        self.entries.push((parent, name));
        self.entries.len() - 1
    }

    /// Names from the root down to `prefix`.
    fn path(&self, mut prefix: Option<usize>) -> Vec<&'a str> {
        let mut path = Vec::new();
        while let Some(index) = prefix {
            let (parent, name) = self.entries[index];
            path.push(name);
            prefix = parent;
        }
        path.reverse();
        path
    }
}

impl Aggregator {
    pub fn new(options: &ReporterOptions) -> Self {
        Self {
            report: CtrfReport::new(options.tool_name.clone())
                .with_environment(options.environment.clone()),
            minimal: options.minimal,
            test_type: options.test_type.clone(),
        }
    }

    pub fn report(&self) -> &CtrfReport {
        &self.report
    }

    pub fn begin(&mut self) {
        self.begin_at(now_millis());
    }

    pub fn begin_at(&mut self, start_ms: i64) {
        self.report.results.summary.start = start_ms;
    }

    pub fn finish(&mut self) {
        self.finish_at(now_millis());
    }

    /// Sets `stop`, never earlier than `start`.
    pub fn finish_at(&mut self, stop_ms: i64) {
        let summary = &mut self.report.results.summary;
        summary.stop = stop_ms.max(summary.start);
    }

    pub fn into_report(self) -> CtrfReport {
        self.report
    }

    /// Walk a typed forest depth-first, pre-order.
    pub fn ingest(&mut self, forest: &[TaskNode]) {
        let mut segments = Segments::default();
        let mut stack: Vec<Frame<'_>> = Vec::new();
        push_children(&mut stack, forest, None, None);

        while let Some(frame) = stack.pop() {
            match frame.node {
                TaskNode::File(file) => {
                    self.report.results.summary.record_suite();
                    let file_name = Some(file.name.as_str()).filter(|n| !n.is_empty());
                    push_children(&mut stack, &file.tasks, frame.prefix, file_name.or(frame.file));
                }
                TaskNode::Suite(suite) => {
                    self.report.results.summary.record_suite();
                    let prefix = if suite.name.is_empty() {
                        frame.prefix
                    } else {
                        Some(segments.push(frame.prefix, &suite.name))
                    };
                    push_children(&mut stack, &suite.tasks, prefix, frame.file);
                }
                TaskNode::Test(test) => {
                    self.record_test(test, &segments.path(frame.prefix), frame.file);
                }
                TaskNode::Unknown => {
                    tracing::warn!(
                        path = %segments.path(frame.prefix).join(NAME_DELIMITER),
                        "unknown task type, skipping node"
                    );
                }
            }
        }
    }

    /// Decode each root on its own and ingest the ones that decode.
    ///
    /// A malformed root aborts only that root; the rest of the session is kept.
    pub fn ingest_values(&mut self, roots: Vec<serde_json::Value>) {
        let total = roots.len();
        let mut forest = Vec::with_capacity(total);
        for (index, value) in roots.into_iter().enumerate() {
            match decode_node(value) {
                Ok(node) => forest.push(node),
                Err(e) => {
                    tracing::error!(index, total, error = %e, "skipping malformed root node");
                }
            }
        }
        self.ingest(&forest);
    }

    fn record_test(&mut self, test: &TestTask, path: &[&str], inherited_file: Option<&str>) {
        let status = map_status(test.effective_state().unwrap_or_default());
        let raw_status = test.raw_state().unwrap_or_default();
        let duration = test
            .result
            .as_ref()
            .and_then(|r| r.duration)
            .map(normalize_duration)
            .unwrap_or(0.0);

        let mut record = CtrfTest::new(display_name(path, &test.name), duration, status);
        if !self.minimal {
            let details = extract_failure_details(test.result.as_ref());
            record.message = Some(details.message);
            record.trace = Some(details.trace);
            record.raw_status = Some(raw_status.to_string());
            record.test_type = Some(self.test_type.clone());
            record.file_path = Some(
                test.file
                    .as_deref()
                    .or(inherited_file)
                    .unwrap_or_default()
                    .to_string(),
            );
            record.retries = Some(test.retry.unwrap_or(0));
        }

        tracing::trace!(name = %record.name, status = %status, "recorded test");
        self.report.results.summary.record(status);
        self.report.results.tests.push(record);
    }
}

fn push_children<'a>(
    stack: &mut Vec<Frame<'a>>,
    children: &'a [TaskNode],
    prefix: Option<usize>,
    file: Option<&'a str>,
) {
    stack.extend(children.iter().rev().map(|node| Frame { node, prefix, file }));
}

/// Join ancestor names and the leaf name, dropping empty segments.
pub fn display_name(path: &[&str], leaf: &str) -> String {
    path.iter()
        .copied()
        .chain(std::iter::once(leaf))
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(NAME_DELIMITER)
}

/// Runner milliseconds, kept fractional; negative or non-finite values count as 0.
fn normalize_duration(ms: f64) -> f64 {
    if ms.is_finite() && ms > 0.0 {
        ms
    } else {
        0.0
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
