//! Reporter options.
//!
//! Every key is optional. Files ending in `.json` are parsed as JSON, anything
//! else as YAML:
//!
//! ```yaml
//! outputDir: reports
//! outputFile: nightly        # written as nightly.json
//! minimal: false
//! testType: integration
//! branchName: main
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::{CtrfError, Result};
use crate::model::Environment;

pub const DEFAULT_OUTPUT_FILE: &str = "report.json";
pub const DEFAULT_OUTPUT_DIR: &str = "vitest-ctrf";
pub const DEFAULT_TEST_TYPE: &str = "unit";
pub const DEFAULT_TOOL_NAME: &str = "vitest";

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ReporterOptions {
    pub output_file: String,

    pub output_dir: PathBuf,

    /// Drop message/trace/rawStatus/type/filePath/retries from test records.
    pub minimal: bool,

    /// Category label stamped on every test.
    pub test_type: String,

    /// `results.tool.name`
    pub tool_name: String,

    #[serde(flatten)]
    pub environment: Environment,
}

impl Default for ReporterOptions {
    fn default() -> Self {
        Self {
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            minimal: false,
            test_type: DEFAULT_TEST_TYPE.to_string(),
            tool_name: DEFAULT_TOOL_NAME.to_string(),
            environment: Environment::default(),
        }
    }
}

impl ReporterOptions {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CtrfError::io(path, e))?;
        let parsed = if path.extension().map(|e| e == "json").unwrap_or(false) {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        } else if content.trim().is_empty() {
            Ok(Self::default())
        } else {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| CtrfError::config(path, message))
    }

    /// Output file name, with `.json` appended when the configured name lacks it.
    pub fn report_filename(&self) -> String {
        normalize_filename(&self.output_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(self.report_filename())
    }
}

/// Idempotent: names already ending in `.json` are returned unchanged.
pub fn normalize_filename(name: &str) -> String {
    if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{name}.json")
    }
}
