use thiserror::Error;

/// Unified error type for kongstate's I/O-facing layers.
///
/// The override cascade itself never fails; these errors only surface while
/// loading override documents.
#[derive(Error, Debug)]
pub enum KongStateError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Reasons an annotation value could not be applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("annotation {key} has non-integer value {value:?}: {source}")]
    InvalidInteger {
        key: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    #[error("annotation {key} has value {value:?} which does not start with '/'")]
    InvalidPath { key: String, value: String },
}

impl AnnotationError {
    /// Annotation key the error refers to.
    pub fn key(&self) -> &str {
        match self {
            AnnotationError::InvalidInteger { key, .. } => key,
            AnnotationError::InvalidPath { key, .. } => key,
        }
    }

    /// Raw annotation value that was rejected.
    pub fn value(&self) -> &str {
        match self {
            AnnotationError::InvalidInteger { value, .. } => value,
            AnnotationError::InvalidPath { value, .. } => value,
        }
    }
}
