//! Error types for the prediction runner.

use std::path::PathBuf;
use thiserror::Error;

/// Every failure the runner can surface.
///
/// Artifact and schema errors carry enough context (file, expected shape) to
/// diagnose a bad deployment without a debugger.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to load artifact {path}: {source}")]
    ArtifactLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("artifact {path} is malformed: {message}")]
    ArtifactFormat { path: PathBuf, message: String },

    #[error("incompatible feature schema ({context}): expected {expected}, got {actual}")]
    IncompatibleSchema {
        expected: String,
        actual: String,
        context: String,
    },

    #[error("invalid input for {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {context}")]
    Csv {
        context: String,
        #[source]
        source: csv::Error,
    },

    #[error("chart rendering failed: {message}")]
    Plot { message: String },

    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("runtime error: {message}")]
    Runtime { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn artifact_load(
        path: impl Into<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ArtifactLoad {
            path: path.into(),
            source: Box::new(source),
        }
    }

    pub fn artifact_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ArtifactFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn incompatible_schema(
        expected: impl Into<String>,
        actual: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::IncompatibleSchema {
            expected: expected.into(),
            actual: actual.into(),
            context: context.into(),
        }
    }

    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    pub fn csv(context: impl Into<String>, source: csv::Error) -> Self {
        Self::Csv {
            context: context.into(),
            source,
        }
    }

    pub fn plot(message: impl std::fmt::Display) -> Self {
        Self::Plot {
            message: message.to_string(),
        }
    }

    /// True for the declared "incompatible feature schema" condition.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::IncompatibleSchema { .. })
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}
