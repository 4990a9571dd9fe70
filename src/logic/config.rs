//! Configuration module

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::Result;
use crate::logic::features::FeatureSchema;

/// Startup configuration for the inference adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Classifier artifact (`.json` forest or `.onnx`)
    pub model_path: PathBuf,

    /// Sidecar metadata; `None` means `<model_path>.meta.json` if it exists
    pub metadata_path: Option<PathBuf>,

    /// Layout the artifact was trained on
    pub schema: FeatureSchema,

    /// Expected SHA-256 of the artifact, hex
    pub expected_sha256: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            model_path: PathBuf::from(constants::get_model_path()),
            metadata_path: constants::get_metadata_path().map(PathBuf::from),
            schema: FeatureSchema::parse(&constants::get_feature_schema())?,
            expected_sha256: constants::get_expected_sha256(),
        })
    }

    pub fn new(model_path: impl Into<PathBuf>, schema: FeatureSchema) -> Self {
        Self {
            model_path: model_path.into(),
            metadata_path: None,
            schema,
            expected_sha256: None,
        }
    }

    pub fn with_metadata(mut self, path: impl Into<PathBuf>) -> Self {
        self.metadata_path = Some(path.into());
        self
    }

    pub fn with_expected_sha256(mut self, digest: impl Into<String>) -> Self {
        self.expected_sha256 = Some(digest.into());
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(constants::DEFAULT_MODEL_PATH, FeatureSchema::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model_path, PathBuf::from(constants::DEFAULT_MODEL_PATH));
        assert_eq!(config.schema, FeatureSchema::Extended);
        assert!(config.metadata_path.is_none());
        assert!(config.expected_sha256.is_none());
    }

    #[test]
    fn test_builder_helpers() {
        let config = Config::new("m.onnx", FeatureSchema::Basic)
            .with_metadata("m.meta.json")
            .with_expected_sha256("abc");
        assert_eq!(config.metadata_path, Some(PathBuf::from("m.meta.json")));
        assert_eq!(config.expected_sha256.as_deref(), Some("abc"));
    }
}
