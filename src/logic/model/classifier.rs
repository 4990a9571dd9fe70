//! Classifier Interface
//!
//! The loaded artifact is a black box with exactly two inference
//! operations. Backends plug in here without touching encoding.

use serde::{Deserialize, Serialize};

use crate::error::{HazardError, Result};
use crate::logic::features::FeatureVector;

/// Binary hazard label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum HazardLabel {
    Safe = 0,
    Hazardous = 1,
}

impl HazardLabel {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_hazardous(self) -> bool {
        self == HazardLabel::Hazardous
    }
}

impl From<HazardLabel> for u8 {
    fn from(label: HazardLabel) -> Self {
        label.as_u8()
    }
}

impl TryFrom<u8> for HazardLabel {
    type Error = HazardError;

    fn try_from(value: u8) -> Result<Self> {
        Self::try_from(i64::from(value))
    }
}

impl TryFrom<i64> for HazardLabel {
    type Error = HazardError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(HazardLabel::Safe),
            1 => Ok(HazardLabel::Hazardous),
            other => Err(HazardError::inference(format!(
                "classifier returned label {} outside {{0, 1}}",
                other
            ))),
        }
    }
}

/// Trait for classifier backends (tree ensemble, ONNX, ...)
///
/// Implementations must be deterministic: the same vector always yields
/// the same label and distribution.
pub trait HazardClassifier: Send + Sync {
    /// Class prediction
    fn predict(&self, vector: &FeatureVector) -> Result<HazardLabel>;

    /// `[P(safe), P(hazardous)]`
    fn predict_proba(&self, vector: &FeatureVector) -> Result<[f64; 2]>;

    /// Input width the artifact declares, when it declares one
    fn n_features(&self) -> Option<usize>;

    /// Short backend name for status and logs
    fn backend(&self) -> &'static str;

    /// Both operations for one request. Backends that produce label and
    /// distribution in one pass override this.
    fn infer(&self, vector: &FeatureVector) -> Result<(HazardLabel, [f64; 2])> {
        let label = self.predict(vector)?;
        let proba = self.predict_proba(vector)?;
        Ok((label, proba))
    }
}

/// Reject a vector whose width differs from the declared input width
pub fn check_width(classifier: &dyn HazardClassifier, vector: &FeatureVector) -> Result<()> {
    if let Some(expected) = classifier.n_features() {
        if vector.len() != expected {
            return Err(HazardError::ShapeMismatch {
                expected,
                actual: vector.len(),
            });
        }
    }
    Ok(())
}
