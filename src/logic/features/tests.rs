//! Integration Tests for Feature Encoding
//!
//! Raw form fields through categorical encoding into ordered vectors.

#[cfg(test)]
mod integration_tests {
    use crate::error::HazardError;
    use crate::logic::features::{
        assemble_vector, encode_orbiting_body, AsteroidInput, FeatureSchema, FeatureVector,
    };

    /// Every schema slot lands where the layout says it does
    #[test]
    fn test_named_fields_to_vector() {
        let input = AsteroidInput::from_named_fields([
            ("absolute_magnitude", "18.2"),
            ("diameter_min_km", "0.5"),
            ("diameter_max_km", "1.1"),
            ("orbiting_body", "Jupiter"),
            ("relative_velocity_kms", "31.0"),
            ("miss_distance_km", "42000"),
        ])
        .unwrap();

        let vector = assemble_vector(FeatureSchema::Basic, &input).unwrap();

        for (name, expected) in [
            ("absolute_magnitude", 18.2f32),
            ("diameter_min_km", 0.5),
            ("diameter_max_km", 1.1),
            ("orbiting_body", 1.0),
            ("relative_velocity_kms", 31.0),
            ("miss_distance_km", 42_000.0),
        ] {
            assert_eq!(vector.get_by_name(name), Some(expected), "feature {}", name);
        }
    }

    /// Unknown bodies encode as Other inside the vector as well
    #[test]
    fn test_unknown_body_in_vector() {
        let input = AsteroidInput::from_named_fields([("orbiting_body", "Ceres")]).unwrap();
        let vector = assemble_vector(FeatureSchema::Basic, &input).unwrap();

        assert_eq!(vector.get(3), Some(f32::from(encode_orbiting_body("Ceres"))));
        assert_eq!(vector.get(3), Some(4.0));
    }

    /// Same input assembles the same vector every time
    #[test]
    fn test_assembly_is_deterministic() {
        let input = AsteroidInput::default();
        let a = assemble_vector(FeatureSchema::Basic, &input).unwrap();
        let b = assemble_vector(FeatureSchema::Basic, &input).unwrap();
        assert_eq!(a, b);
    }

    /// A basic vector can never pass as an extended one
    #[test]
    fn test_schema_widths_are_not_interchangeable() {
        let basic = assemble_vector(FeatureSchema::Basic, &AsteroidInput::default()).unwrap();
        let reused = FeatureVector::from_values(FeatureSchema::Extended, basic.as_slice().to_vec());

        assert!(matches!(
            reused,
            Err(HazardError::ShapeMismatch { expected: 10, actual: 6 })
        ));
    }

    /// Tampered layout metadata is caught by validation
    #[test]
    fn test_deserialized_vector_with_foreign_hash() {
        let vector = assemble_vector(FeatureSchema::Basic, &AsteroidInput::default()).unwrap();
        let mut json = serde_json::to_value(&vector).unwrap();
        json["layout_hash"] = serde_json::json!(vector.layout_hash ^ 0xFFFF_FFFF);

        let tampered: FeatureVector = serde_json::from_value(json).unwrap();
        assert!(matches!(
            tampered.validate(),
            Err(HazardError::LayoutMismatch { .. })
        ));
    }
}
