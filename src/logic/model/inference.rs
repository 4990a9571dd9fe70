//! Inference Engine
//!
//! `HazardEngine` is the one immutable handle to the loaded classifier.
//! Build it once at startup and pass it to whoever needs predictions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::classifier::{HazardClassifier, HazardLabel};
use super::loader::load_classifier;
use super::metadata::ModelMetadata;
use crate::error::{HazardError, Result};
use crate::logic::config::Config;
use crate::logic::features::{assemble_vector, AsteroidInput, FeatureSchema, FeatureVector};
use crate::logic::report::{format_result, ImpactReport};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: HazardLabel,
    /// P(hazardous), 0.0 - 1.0
    pub probability: f64,
    pub inference_time_us: u64,
    /// Backend that produced it
    pub method: String,
}

/// Engine Status for the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineStatus {
    pub model_loaded: bool,
    pub model_name: String,
    pub backend: String,
    pub schema: FeatureSchema,
    pub features: usize,
    pub avg_latency_ms: f32,
    pub inference_count: u64,
}

// ============================================================================
// ENGINE
// ============================================================================

pub struct HazardEngine {
    classifier: Arc<dyn HazardClassifier>,
    schema: FeatureSchema,
    metadata: ModelMetadata,
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

impl std::fmt::Debug for HazardEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HazardEngine")
            .field("backend", &self.classifier.backend())
            .field("schema", &self.schema)
            .field("metadata", &self.metadata)
            .finish()
    }
}

impl HazardEngine {
    /// Wrap an already constructed classifier.
    /// Fails if the classifier declares a width other than the schema's.
    pub fn new(
        classifier: Arc<dyn HazardClassifier>,
        schema: FeatureSchema,
        metadata: ModelMetadata,
    ) -> Result<Self> {
        if let Some(width) = classifier.n_features() {
            if width != schema.feature_count() {
                return Err(HazardError::SchemaMismatch(format!(
                    "classifier expects {} features, {} schema has {}",
                    width,
                    schema,
                    schema.feature_count()
                )));
            }
        }

        Ok(Self {
            classifier,
            schema,
            metadata,
            latency_sum_us: AtomicU64::new(0),
            inference_count: AtomicU64::new(0),
        })
    }

    /// Convenience for classifiers built in memory
    pub fn from_classifier(classifier: Arc<dyn HazardClassifier>, schema: FeatureSchema) -> Result<Self> {
        let metadata = ModelMetadata::in_memory(classifier.backend(), schema);
        Self::new(classifier, schema, metadata)
    }

    /// Load the configured artifact. Any error is startup-fatal.
    pub fn load(config: &Config) -> Result<Self> {
        let loaded = load_classifier(config)?;
        Self::new(loaded.classifier, config.schema, loaded.metadata)
    }

    pub fn schema(&self) -> FeatureSchema {
        self.schema
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Run the classifier on one vector. No retries.
    pub fn predict(&self, vector: &FeatureVector) -> Result<PredictionResult> {
        let start_time = Instant::now();

        if vector.schema != self.schema {
            return Err(HazardError::ShapeMismatch {
                expected: self.schema.feature_count(),
                actual: vector.len(),
            });
        }
        vector.validate()?;
        vector.check_finite()?;

        let (label, proba) = self.classifier.infer(vector)?;
        let probability = proba[1];
        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(HazardError::inference(format!(
                "classifier returned hazardous probability {}",
                probability
            )));
        }

        let inference_time_us = start_time.elapsed().as_micros() as u64;
        self.latency_sum_us.fetch_add(inference_time_us, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);

        log::debug!(
            "Prediction: label={} p={:.4} ({}us, {})",
            label.as_u8(),
            probability,
            inference_time_us,
            self.classifier.backend()
        );

        Ok(PredictionResult {
            label,
            probability,
            inference_time_us,
            method: self.classifier.backend().to_string(),
        })
    }

    /// Full request: encode, assemble, predict, format
    pub fn assess(&self, input: &AsteroidInput) -> Result<ImpactReport> {
        let vector = assemble_vector(self.schema, input)?;
        let prediction = self.predict(&vector)?;
        Ok(format_result(prediction.label, prediction.probability))
    }

    pub fn status(&self) -> EngineStatus {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 { (sum as f32 / count as f32) / 1000.0 } else { 0.0 };

        EngineStatus {
            model_loaded: true,
            model_name: self.metadata.model_path.clone(),
            backend: self.classifier.backend().to_string(),
            schema: self.schema,
            features: self.schema.feature_count(),
            avg_latency_ms: avg,
            inference_count: count,
        }
    }
}
