//! CTRF report document.
//!
//! Shape on disk:
//! `{"results": {"tool": {..}, "summary": {..}, "tests": [..], "environment"?: {..}}}`

use serde::{Deserialize, Serialize, Serializer};

use crate::report::summary::Summary;
use crate::status::TestState;

/// Top-level CTRF document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CtrfReport {
    pub results: Results,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results {
    pub tool: Tool,
    pub summary: Summary,
    /// Traversal order of the runner tree.
    pub tests: Vec<CtrfTest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<Environment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
}

/// One normalized leaf test.
///
/// The optional fields are the extended set; all of them are `None` in minimal mode
/// and all of them are `Some` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtrfTest {
    /// Ancestor suite names and the test name, joined root to leaf.
    pub name: String,
    /// Milliseconds as the runner measured them. Whole values serialize as integers.
    #[serde(serialize_with = "serialize_millis")]
    pub duration: f64,
    pub status: TestState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
    /// Runner token before normalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_status: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

impl CtrfTest {
    pub fn new(name: impl Into<String>, duration: f64, status: TestState) -> Self {
        Self {
            name: name.into(),
            duration,
            status,
            message: None,
            trace: None,
            raw_status: None,
            test_type: None,
            file_path: None,
            retries: None,
        }
    }
}

/// Largest integer an `f64` holds exactly.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn serialize_millis<S: Serializer>(ms: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if ms.fract() == 0.0 && (0.0..=MAX_EXACT_INT).contains(ms) {
        serializer.serialize_u64(*ms as u64)
    } else {
        serializer.serialize_f64(*ms)
    }
}

/// Build and environment metadata stamped on the report.
///
/// Doubles as the passthrough section of the reporter options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_release: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_environment: Option<String>,
}

impl Environment {
    pub fn is_empty(&self) -> bool {
        *self == Environment::default()
    }
}

impl CtrfReport {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            results: Results {
                tool: Tool {
                    name: tool_name.into(),
                },
                summary: Summary::default(),
                tests: Vec::new(),
                environment: None,
            },
        }
    }

    pub fn summary(&self) -> &Summary {
        &self.results.summary
    }

    pub fn tests(&self) -> &[CtrfTest] {
        &self.results.tests
    }

    /// Attach environment metadata; an all-empty block is dropped.
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.results.environment = if environment.is_empty() {
            None
        } else {
            Some(environment)
        };
        self
    }
}
