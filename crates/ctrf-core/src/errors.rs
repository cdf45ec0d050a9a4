//! Error types for report generation.

use std::path::PathBuf;

/// Errors raised while loading options, decoding runner trees, or writing reports.
///
/// The reporter lifecycle never lets these escape to the host runner; they are
/// converted into log events at that boundary.
#[derive(Debug, thiserror::Error)]
pub enum CtrfError {
    /// Filesystem failure (directory creation, read, write).
    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report could not be serialized.
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Options file could not be parsed.
    #[error("invalid reporter config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// A runner tree node could not be decoded.
    #[error("malformed task node: {message}")]
    Decode { message: String },
}

impl CtrfError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CtrfError>;
