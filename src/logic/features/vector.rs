//! Feature Vector - Core data structure for ML input
//!
//! **Versioned feature vector with layout validation**
//!
//! Uses the centralized layouts from `layout.rs` for:
//! - Consistent feature ordering
//! - Version tracking
//! - Layout hash for compatibility checks
//!
//! Unlike a raw `Vec<f32>`, a `FeatureVector` can never hold the wrong
//! number of values for its schema.

use serde::{Deserialize, Serialize};

use super::input::AsteroidInput;
use super::layout::{feature_index, layout_hash, validate_layout, FeatureSchema, FEATURE_VERSION};
use crate::error::{HazardError, Result};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub schema: FeatureSchema,
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Values in the order defined by the schema layout
    values: Vec<f32>,
}

impl FeatureVector {
    /// Wrap raw values. Fails on wrong length, never pads or truncates.
    pub fn from_values(schema: FeatureSchema, values: Vec<f32>) -> Result<Self> {
        let expected = schema.feature_count();
        if values.len() != expected {
            return Err(HazardError::ShapeMismatch {
                expected,
                actual: values.len(),
            });
        }

        Ok(Self {
            schema,
            version: FEATURE_VERSION,
            layout_hash: layout_hash(schema),
            values,
        })
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.values.get(index).copied()
    }

    pub fn get_by_name(&self, name: &str) -> Option<f32> {
        feature_index(self.schema, name).and_then(|i| self.get(i))
    }

    /// Validate that this vector is compatible with its schema's current layout
    pub fn validate(&self) -> Result<()> {
        validate_layout(self.schema, self.version, self.layout_hash)?;

        let expected = self.schema.feature_count();
        if self.values.len() != expected {
            return Err(HazardError::ShapeMismatch {
                expected,
                actual: self.values.len(),
            });
        }

        Ok(())
    }

    /// First non-finite value, reported by feature name
    pub fn check_finite(&self) -> Result<()> {
        for (name, value) in self.schema.layout().iter().zip(self.values.iter()) {
            if !value.is_finite() {
                return Err(HazardError::invalid_value(*name, value));
            }
        }
        Ok(())
    }

    pub fn feature_names(&self) -> &'static [&'static str] {
        self.schema.layout()
    }

    /// Convert to JSON-serializable format for logging
    pub fn to_log_entry(&self) -> serde_json::Value {
        serde_json::json!({
            "schema": self.schema,
            "feature_version": self.version,
            "layout_hash": self.layout_hash,
            "values": self.values,
            "named_values": self.schema.layout().iter()
                .zip(self.values.iter())
                .map(|(name, value)| (name.to_string(), *value))
                .collect::<std::collections::BTreeMap<_, _>>(),
        })
    }
}

// ============================================================================
// ASSEMBLY
// ============================================================================

/// Pack an input into the fixed order of `schema`.
///
/// The extended schema needs all four extended fields and names the first
/// absent one. Extended fields on a basic assembly are ignored.
pub fn assemble_vector(schema: FeatureSchema, input: &AsteroidInput) -> Result<FeatureVector> {
    let mut values = Vec::with_capacity(schema.feature_count());
    values.extend_from_slice(&[
        input.absolute_magnitude,
        input.diameter_min_km,
        input.diameter_max_km,
        f32::from(input.orbiting_body.code()),
        input.relative_velocity_kms,
        input.miss_distance_km,
    ]);

    match schema {
        FeatureSchema::Basic => {
            if !input.extended.is_empty() {
                log::debug!("Basic schema: ignoring extended fields");
            }
        }
        FeatureSchema::Extended => {
            values.extend_from_slice(&input.extended.values()?);
        }
    }

    FeatureVector::from_values(schema, values)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::features::input::ExtendedFeatures;
    use crate::logic::features::orbiting::OrbitingBody;

    #[test]
    fn test_from_values_exact_length() {
        let vector = FeatureVector::from_values(FeatureSchema::Basic, vec![1.0; 6]).unwrap();
        assert_eq!(vector.version, FEATURE_VERSION);
        assert_eq!(vector.layout_hash, layout_hash(FeatureSchema::Basic));
        assert_eq!(vector.len(), 6);
        assert!(vector.validate().is_ok());
    }

    #[test]
    fn test_from_values_rejects_short_and_long() {
        let short = FeatureVector::from_values(FeatureSchema::Basic, vec![1.0; 5]);
        assert!(matches!(
            short,
            Err(HazardError::ShapeMismatch { expected: 6, actual: 5 })
        ));

        let long = FeatureVector::from_values(FeatureSchema::Extended, vec![1.0; 11]);
        assert!(matches!(
            long,
            Err(HazardError::ShapeMismatch { expected: 10, actual: 11 })
        ));
    }

    #[test]
    fn test_assemble_basic_order() {
        let input = AsteroidInput {
            orbiting_body: OrbitingBody::Venus,
            ..Default::default()
        };
        let vector = assemble_vector(FeatureSchema::Basic, &input).unwrap();

        assert_eq!(vector.as_slice(), &[22.0, 0.1, 0.2, 3.0, 25.0, 500_000.0]);
        assert_eq!(vector.get_by_name("orbiting_body"), Some(3.0));
    }

    #[test]
    fn test_assemble_extended_order() {
        let input = AsteroidInput::default().with_extended(ExtendedFeatures::form_defaults());
        let vector = assemble_vector(FeatureSchema::Extended, &input).unwrap();

        assert_eq!(
            vector.as_slice(),
            &[22.0, 0.1, 0.2, 0.0, 25.0, 500_000.0, 0.15, 100.0, 5.7, 50.0]
        );
        assert_eq!(vector.get_by_name("threat_score"), Some(50.0));
    }

    #[test]
    fn test_assemble_extended_requires_fields() {
        let result = assemble_vector(FeatureSchema::Extended, &AsteroidInput::default());
        assert!(matches!(result, Err(HazardError::MissingFeature("diameter_mean_km"))));
    }

    #[test]
    fn test_assemble_extended_names_first_absent_field() {
        let partial = ExtendedFeatures {
            threat_score: None,
            ..ExtendedFeatures::form_defaults()
        };
        let input = AsteroidInput::default().with_extended(partial);

        let result = assemble_vector(FeatureSchema::Extended, &input);
        assert!(matches!(result, Err(HazardError::MissingFeature("threat_score"))));

        // Basic assembly does not care
        assert!(assemble_vector(FeatureSchema::Basic, &input).is_ok());
    }

    #[test]
    fn test_assemble_basic_ignores_extended() {
        let input = AsteroidInput::default().with_extended(ExtendedFeatures::form_defaults());
        let vector = assemble_vector(FeatureSchema::Basic, &input).unwrap();
        assert_eq!(vector.len(), 6);
    }

    #[test]
    fn test_check_finite() {
        let mut values = vec![1.0; 6];
        values[4] = f32::NAN;
        let vector = FeatureVector::from_values(FeatureSchema::Basic, values).unwrap();

        match vector.check_finite() {
            Err(HazardError::InvalidValue { field, .. }) => assert_eq!(field, "relative_velocity_kms"),
            other => panic!("Expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_to_log_entry() {
        let vector = assemble_vector(FeatureSchema::Basic, &AsteroidInput::default()).unwrap();
        let log = vector.to_log_entry();

        assert_eq!(log["feature_version"], FEATURE_VERSION);
        assert_eq!(log["schema"], "basic");
        assert_eq!(log["named_values"]["absolute_magnitude"], 22.0);
    }
}
