use std::path::PathBuf;

use thiserror::Error;

use crate::validate::ValidationReport;

#[derive(Debug, Error)]
pub enum SeedError {
    /// Transport failure, error status, or a body that is not UTF-8.
    #[error("failed to fetch {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The page no longer carries the embedded state block.
    #[error("missing data: {0}")]
    MissingData(String),

    #[error("malformed data: {0}")]
    MalformedData(String),

    #[error("seed validation failed\n{0}")]
    Validation(ValidationReport),

    #[error("failed to encode {what}: {source}")]
    Encode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SeedError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SeedError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = SeedError> = std::result::Result<T, E>;
