//! Error taxonomy for encoding, loading, and inference.
//!
//! Nothing here is retried or recovered internally. Every failure goes
//! straight back to the caller.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, HazardError>;

#[derive(Error, Debug)]
pub enum HazardError {
    /// Classifier artifact missing, unreadable, corrupt, or failing its checksum.
    /// Fatal at startup.
    #[error("Artifact load error: {0}")]
    ArtifactLoad(String),

    /// Vector length does not match what the schema or classifier expects.
    #[error("Shape mismatch: expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Vector was assembled against a different feature layout.
    #[error(
        "Feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), got v{actual_version} (hash: {actual_hash:08x})"
    )]
    LayoutMismatch {
        expected_version: u8,
        expected_hash: u32,
        actual_version: u8,
        actual_hash: u32,
    },

    /// Artifact and configured schema disagree.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// Raw field could not be coerced to a finite number.
    #[error("Invalid value for '{field}': {value}")]
    InvalidValue { field: String, value: String },

    /// Extended schema requested without the extended fields.
    #[error("Missing feature: {0}")]
    MissingFeature(&'static str),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HazardError {
    pub fn artifact(msg: impl Into<String>) -> Self {
        HazardError::ArtifactLoad(msg.into())
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        HazardError::Inference(msg.into())
    }

    pub fn invalid_value(field: impl Into<String>, value: impl ToString) -> Self {
        HazardError::InvalidValue {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// True for failures that must abort startup.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            HazardError::ArtifactLoad(_) | HazardError::SchemaMismatch(_) | HazardError::Config(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_mismatch_message() {
        let err = HazardError::ShapeMismatch { expected: 6, actual: 5 };
        assert_eq!(err.to_string(), "Shape mismatch: expected 6 features, got 5");
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatal_classification() {
        assert!(HazardError::artifact("missing").is_fatal());
        assert!(HazardError::SchemaMismatch("x".into()).is_fatal());
        assert!(!HazardError::inference("boom").is_fatal());
    }
}
