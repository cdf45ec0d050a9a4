//! `results.summary` block of a CTRF report.
//!
//! Counters are bumped once per observed leaf test. `start`/`stop` are wall-clock
//! milliseconds since the Unix epoch.

use serde::{Deserialize, Serialize};

use crate::status::TestState;

/// Aggregated counters and timing boundaries for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Total leaf tests observed
    pub tests: u64,

    pub passed: u64,

    pub failed: u64,

    /// Never bumped by the current status mapping
    pub pending: u64,

    pub skipped: u64,

    pub other: u64,

    /// Suite and file nodes visited
    pub suites: u64,

    /// Session start, ms since epoch
    pub start: i64,

    /// Session stop, ms since epoch
    pub stop: i64,
}

impl Summary {
    /// Count one leaf test under `state`.
    pub fn record(&mut self, state: TestState) {
        match state {
            TestState::Passed => self.passed += 1,
            TestState::Failed => self.failed += 1,
            TestState::Pending => self.pending += 1,
            TestState::Skipped => self.skipped += 1,
            TestState::Other => self.other += 1,
        }
        self.tests += 1;
    }

    pub fn record_suite(&mut self) {
        self.suites += 1;
    }

    /// Sum of the per-status counters. Equals `tests` for any summary built via `record`.
    pub fn counted(&self) -> u64 {
        self.passed + self.failed + self.pending + self.skipped + self.other
    }

    /// Wall-clock duration of the session in milliseconds (0 until both bounds are set).
    pub fn duration_ms(&self) -> u64 {
        if self.start == 0 || self.stop < self.start {
            return 0;
        }
        (self.stop - self.start) as u64
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}
