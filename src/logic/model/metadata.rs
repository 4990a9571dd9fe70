//! Model Metadata
//!
//! Optional sidecar JSON shipped next to the artifact, and the record of
//! what actually got loaded.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{HazardError, Result};
use crate::logic::features::layout::{validate_feature_names, FeatureSchema};

/// Sidecar file contents. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SidecarMetadata {
    #[serde(default)]
    pub schema: Option<FeatureSchema>,
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    #[serde(default)]
    pub n_features: Option<usize>,
    #[serde(default)]
    pub sha256: Option<String>,
    #[serde(default)]
    pub model_type: Option<String>,
}

impl SidecarMetadata {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HazardError::artifact(format!("Failed to read metadata {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| HazardError::artifact(format!("Failed to parse metadata {}: {}", path.display(), e)))
    }

    /// `<artifact>.meta.json`
    pub fn default_path(model_path: &Path) -> PathBuf {
        let mut name = model_path.as_os_str().to_os_string();
        name.push(".meta.json");
        PathBuf::from(name)
    }

    /// Width declared either directly or through the feature list
    pub fn declared_width(&self) -> Option<usize> {
        self.n_features
            .or_else(|| self.feature_names.as_ref().map(|names| names.len()))
    }

    /// Reject a sidecar that describes a different schema than the deployed one
    pub fn check_schema(&self, schema: FeatureSchema) -> Result<()> {
        if let Some(declared) = self.schema {
            if declared != schema {
                return Err(HazardError::SchemaMismatch(format!(
                    "artifact was trained on the {} schema, configured schema is {}",
                    declared, schema
                )));
            }
        }

        if let Some(names) = &self.feature_names {
            validate_feature_names(schema, names)?;
        }

        if let (Some(n), Some(names)) = (self.n_features, &self.feature_names) {
            if n != names.len() {
                return Err(HazardError::artifact(format!(
                    "metadata declares n_features={} but lists {} names",
                    n,
                    names.len()
                )));
            }
        }

        Ok(())
    }
}

/// What was loaded, for status and logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_path: String,
    pub model_type: String,
    pub backend: String,
    pub schema: FeatureSchema,
    pub features: usize,
    pub sha256: String,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
}

impl ModelMetadata {
    /// Metadata for a classifier constructed in memory
    pub fn in_memory(backend: &str, schema: FeatureSchema) -> Self {
        Self {
            model_path: "<memory>".to_string(),
            model_type: backend.to_string(),
            backend: backend.to_string(),
            schema,
            features: schema.feature_count(),
            sha256: String::new(),
            loaded_at: chrono::Utc::now(),
        }
    }
}

/// Compute SHA256 hash of file as lowercase hex
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .map_err(|e| HazardError::artifact(format!("Cannot open {}: {}", path.display(), e)))?;
    let mut hasher = Sha256::new();
    std::io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

/// Compare against an expected hex digest, case-insensitively
pub fn verify_checksum(actual: &str, expected: &str) -> Result<()> {
    if !actual.eq_ignore_ascii_case(expected.trim()) {
        return Err(HazardError::artifact(format!(
            "Checksum mismatch: expected {}, got {}",
            expected.trim(),
            actual
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::layout::BASIC_LAYOUT;
    use std::io::Write;

    #[test]
    fn test_default_path() {
        let path = SidecarMetadata::default_path(Path::new("models/forest.json"));
        assert_eq!(path, PathBuf::from("models/forest.json.meta.json"));
    }

    #[test]
    fn test_file_hash_known_value() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"abc").unwrap();

        let hash = compute_file_hash(file.path()).unwrap();
        assert_eq!(
            hash,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(verify_checksum(&hash, &hash.to_uppercase()).is_ok());
        assert!(verify_checksum(&hash, "00").is_err());
    }

    #[test]
    fn test_check_schema() {
        let sidecar = SidecarMetadata {
            schema: Some(FeatureSchema::Basic),
            feature_names: Some(BASIC_LAYOUT.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        };

        assert!(sidecar.check_schema(FeatureSchema::Basic).is_ok());
        assert!(matches!(
            sidecar.check_schema(FeatureSchema::Extended),
            Err(HazardError::SchemaMismatch(_))
        ));
        assert_eq!(sidecar.declared_width(), Some(6));
    }

    #[test]
    fn test_check_schema_inconsistent_width() {
        let sidecar = SidecarMetadata {
            n_features: Some(10),
            feature_names: Some(BASIC_LAYOUT.iter().map(|s| s.to_string()).collect()),
            ..Default::default()
        };
        assert!(sidecar.check_schema(FeatureSchema::Basic).is_err());
    }
}
