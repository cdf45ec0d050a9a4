//! Persists a finished report as pretty-printed JSON.

use std::path::{Path, PathBuf};

use crate::config::{normalize_filename, ReporterOptions};
use crate::errors::{CtrfError, Result};
use crate::model::CtrfReport;

/// Writes `<output_dir>/<output_file>`; one write per session.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    filename: String,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, output_file: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            filename: normalize_filename(output_file),
        }
    }

    pub fn from_options(options: &ReporterOptions) -> Self {
        Self::new(options.output_dir.clone(), &options.output_file)
    }

    pub fn path(&self) -> PathBuf {
        self.output_dir.join(&self.filename)
    }

    /// Create the output directory (and parents) if missing.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output_dir).map_err(|e| CtrfError::io(&self.output_dir, e))
    }

    /// Serialize and write the report. Creates the directory if needed.
    pub fn write(&self, report: &CtrfReport) -> Result<PathBuf> {
        self.ensure_dir()?;
        let path = self.path();
        write_json(report, &path)?;
        Ok(path)
    }

    /// Like [`ReportWriter::write`], but failures are logged instead of returned.
    pub fn persist(&self, report: &CtrfReport) -> Option<PathBuf> {
        match self.write(report) {
            Ok(path) => {
                tracing::info!(path = %path.display(), "wrote CTRF report");
                Some(path)
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to write CTRF report");
                None
            }
        }
    }
}

/// Two-space indented JSON with a trailing newline.
pub fn to_json_string(report: &CtrfReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

pub fn write_json(report: &CtrfReport, out: &Path) -> Result<()> {
    let json = to_json_string(report)?;
    std::fs::write(out, json).map_err(|e| CtrfError::io(out, e))
}
