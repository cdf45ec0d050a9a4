use crate::model::CtrfReport;
use crate::status::TestState;

/// Lines for the human summary: one per failed test, then a totals line.
/// Deterministic, unit-testable; printing is left to [`print_summary`].
#[must_use]
pub fn format_summary(report: &CtrfReport) -> Vec<String> {
    let mut lines = Vec::new();
    for t in report.tests() {
        if t.status != TestState::Failed {
            continue;
        }
        lines.push(format!("❌ {}  ({}ms)", t.name, t.duration));
        if let Some(msg) = t.message.as_deref().filter(|m| !m.is_empty()) {
            let first = msg.lines().next().unwrap_or_default();
            lines.push(format!("    {}", first));
        }
    }

    let s = report.summary();
    lines.push(format!(
        "Summary: {} tests, {} passed, {} failed, {} skipped, {} pending, {} other ({} suites, {}ms)",
        s.tests,
        s.passed,
        s.failed,
        s.skipped,
        s.pending,
        s.other,
        s.suites,
        s.duration_ms()
    ));
    lines
}

pub fn print_summary(report: &CtrfReport) {
    eprintln!();
    for line in format_summary(report) {
        eprintln!("{}", line);
    }
}
