use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = PipelineError> = std::result::Result<T, E>;

/// Fatal pipeline errors. Any of these aborts the batch before the
/// output file is written.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unknown category {0:?}")]
    UnknownCategory(String),
    #[error("failed to persist {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::UnknownCategory(_) => "unknown_category",
            PipelineError::Persistence { .. } => "persistence",
            PipelineError::Config(_) => "config",
            PipelineError::Io { .. } => "io",
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A single failed translation attempt. Never fatal: the translation
/// stage turns exhausted retries into the sentinel value.
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation service returned status {0}")]
    Status(u16),
    #[error("malformed translation response: {0}")]
    MalformedResponse(String),
}
