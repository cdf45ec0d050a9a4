//! Normalized test status and the runner-token mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Runner-agnostic test status as written to the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestState {
    Passed,
    Failed,
    Skipped,
    /// Counted in the summary, but no runner token maps here yet.
    Pending,
    Other,
}

impl TestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestState::Passed => "passed",
            TestState::Failed => "failed",
            TestState::Skipped => "skipped",
            TestState::Pending => "pending",
            TestState::Other => "other",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TestState::Failed)
    }
}

impl fmt::Display for TestState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a runner task state (or mode) token to a normalized status.
///
/// Total over every input: `todo`, `only`, `run`, and anything the runner may
/// add later all land on [`TestState::Other`].
#[must_use]
pub fn map_status(token: &str) -> TestState {
    match token {
        "pass" => TestState::Passed,
        "fail" => TestState::Failed,
        "skip" => TestState::Skipped,
        "todo" | "only" | "run" => TestState::Other,
        _ => TestState::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_tokens_map_to_their_status() {
        assert_eq!(map_status("pass"), TestState::Passed);
        assert_eq!(map_status("fail"), TestState::Failed);
        assert_eq!(map_status("skip"), TestState::Skipped);
    }

    #[test]
    fn non_terminal_and_unknown_tokens_are_other() {
        for token in ["todo", "only", "run", "bogus", "", "PASS", "passed"] {
            assert_eq!(map_status(token), TestState::Other, "token {token:?}");
        }
    }

    #[test]
    fn nothing_maps_to_pending() {
        for token in ["pass", "fail", "skip", "todo", "only", "run", "pending", "queued"] {
            assert_ne!(map_status(token), TestState::Pending, "token {token:?}");
        }
    }

    #[test]
    fn state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&TestState::Passed).unwrap(),
            r#""passed""#
        );
        assert_eq!(
            serde_json::to_string(&TestState::Pending).unwrap(),
            r#""pending""#
        );
        assert_eq!(TestState::Skipped.to_string(), "skipped");
    }
}
