//! Artifact Loader
//!
//! Runs once at startup. Any failure here is fatal: there is no fallback
//! model and no partial operation.

use std::path::Path;
use std::sync::Arc;

use super::classifier::HazardClassifier;
use super::forest::ForestClassifier;
use super::metadata::{compute_file_hash, verify_checksum, ModelMetadata, SidecarMetadata};
use super::onnx::OnnxClassifier;
use crate::error::{HazardError, Result};
use crate::logic::config::Config;

/// A loaded classifier and what we know about it
pub struct LoadedModel {
    pub classifier: Arc<dyn HazardClassifier>,
    pub metadata: ModelMetadata,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("backend", &self.classifier.backend())
            .field("metadata", &self.metadata)
            .finish()
    }
}

/// Artifact formats this build can deserialize
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    ForestJson,
    Onnx,
}

impl ArtifactFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "json" => Ok(ArtifactFormat::ForestJson),
            "onnx" => Ok(ArtifactFormat::Onnx),
            "joblib" | "pkl" | "pickle" => Err(HazardError::artifact(format!(
                "{}: pickled models cannot be loaded; export to ONNX or forest JSON",
                path.display()
            ))),
            _ => Err(HazardError::artifact(format!(
                "{}: unsupported artifact format (expected .json or .onnx)",
                path.display()
            ))),
        }
    }
}

/// Load, verify and schema-check the configured artifact
pub fn load_classifier(config: &Config) -> Result<LoadedModel> {
    let path = config.model_path.as_path();
    log::info!("Loading classifier artifact: {}", path.display());

    if !path.is_file() {
        return Err(HazardError::artifact(format!("Model not found: {}", path.display())));
    }

    let format = ArtifactFormat::from_path(path)?;
    let sidecar = load_sidecar(config)?;

    let sha256 = compute_file_hash(path)?;
    log::info!("Artifact sha256: {}", sha256);

    if let Some(expected) = config.expected_sha256.as_deref() {
        verify_checksum(&sha256, expected)?;
    }
    if let Some(expected) = sidecar.as_ref().and_then(|s| s.sha256.as_deref()) {
        verify_checksum(&sha256, expected)?;
    }

    if let Some(sidecar) = &sidecar {
        sidecar.check_schema(config.schema)?;
    }
    let declared_width = sidecar.as_ref().and_then(|s| s.declared_width());

    let classifier: Arc<dyn HazardClassifier> = match format {
        ArtifactFormat::ForestJson => {
            let forest = ForestClassifier::from_file(path)?;
            log::info!("Forest artifact has {} trees", forest.tree_count());
            Arc::new(forest)
        }
        ArtifactFormat::Onnx => Arc::new(OnnxClassifier::from_file(path, declared_width)?),
    };

    check_artifact_width(classifier.as_ref(), declared_width, config)?;

    let metadata = ModelMetadata {
        model_path: path.display().to_string(),
        model_type: sidecar
            .as_ref()
            .and_then(|s| s.model_type.clone())
            .unwrap_or_else(|| classifier.backend().to_string()),
        backend: classifier.backend().to_string(),
        schema: config.schema,
        features: config.schema.feature_count(),
        sha256,
        loaded_at: chrono::Utc::now(),
    };

    log::info!(
        "Classifier loaded ({} backend, {} schema, {} features)",
        metadata.backend,
        metadata.schema,
        metadata.features
    );

    Ok(LoadedModel { classifier, metadata })
}

fn load_sidecar(config: &Config) -> Result<Option<SidecarMetadata>> {
    match &config.metadata_path {
        // Explicitly configured: must exist
        Some(path) => SidecarMetadata::load(path).map(Some),
        None => {
            let path = SidecarMetadata::default_path(&config.model_path);
            if path.is_file() {
                log::info!("Using sidecar metadata: {}", path.display());
                SidecarMetadata::load(&path).map(Some)
            } else {
                Ok(None)
            }
        }
    }
}

fn check_artifact_width(
    classifier: &dyn HazardClassifier,
    sidecar_width: Option<usize>,
    config: &Config,
) -> Result<()> {
    let expected = config.schema.feature_count();

    for (source, width) in [("artifact", classifier.n_features()), ("metadata", sidecar_width)] {
        if let Some(width) = width {
            if width != expected {
                return Err(HazardError::SchemaMismatch(format!(
                    "{} expects {} features, {} schema has {}",
                    source, width, config.schema, expected
                )));
            }
        }
    }

    if classifier.n_features().is_none() && sidecar_width.is_none() {
        log::warn!(
            "Artifact does not declare its input width; shape errors will surface at prediction time"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::{FeatureSchema, FeatureVector};
    use crate::logic::model::HazardLabel;

    /// Backend whose only interesting property is its declared width
    struct FixedWidth(Option<usize>);

    impl HazardClassifier for FixedWidth {
        fn predict(&self, _vector: &FeatureVector) -> Result<HazardLabel> {
            Ok(HazardLabel::Safe)
        }

        fn predict_proba(&self, _vector: &FeatureVector) -> Result<[f64; 2]> {
            Ok([1.0, 0.0])
        }

        fn n_features(&self) -> Option<usize> {
            self.0
        }

        fn backend(&self) -> &'static str {
            "fixed"
        }
    }

    #[test]
    fn test_graph_width_for_other_schema_is_rejected() {
        let config = Config::new("model.onnx", FeatureSchema::Extended);

        // A 6-input graph deployed under the extended schema
        assert!(matches!(
            check_artifact_width(&FixedWidth(Some(6)), None, &config),
            Err(HazardError::SchemaMismatch(_))
        ));
        assert!(check_artifact_width(&FixedWidth(Some(10)), None, &config).is_ok());
        assert!(check_artifact_width(&FixedWidth(None), None, &config).is_ok());
        assert!(matches!(
            check_artifact_width(&FixedWidth(None), Some(6), &config),
            Err(HazardError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ArtifactFormat::from_path(Path::new("m/forest.JSON")).unwrap(),
            ArtifactFormat::ForestJson
        );
        assert_eq!(
            ArtifactFormat::from_path(Path::new("m/model.onnx")).unwrap(),
            ArtifactFormat::Onnx
        );
        assert!(ArtifactFormat::from_path(Path::new("m/model.joblib")).is_err());
        assert!(ArtifactFormat::from_path(Path::new("m/model")).is_err());
    }
}
