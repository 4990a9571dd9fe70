//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! The classifier only sees a bare vector of numbers. If the order here
//! drifts from the order used at training time, predictions are silently
//! wrong. Nothing downstream can detect it.
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

use crate::error::{HazardError, Result};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when either layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUTS (Authoritative source)
// ============================================================================

/// Basic layout: six raw observational fields
pub const BASIC_LAYOUT: &[&str] = &[
    "absolute_magnitude",    // 0
    "diameter_min_km",       // 1
    "diameter_max_km",       // 2
    "orbiting_body",         // 3: encoded, see orbiting.rs
    "relative_velocity_kms", // 4
    "miss_distance_km",      // 5
];

/// Extended layout: basic fields followed by four engineered fields
pub const EXTENDED_LAYOUT: &[&str] = &[
    "absolute_magnitude",    // 0
    "diameter_min_km",       // 1
    "diameter_max_km",       // 2
    "orbiting_body",         // 3
    "relative_velocity_kms", // 4
    "miss_distance_km",      // 5
    "diameter_mean_km",      // 6
    "velocity_diameter_ratio", // 7
    "log_miss_distance",     // 8
    "threat_score",          // 9
];

pub const BASIC_FEATURE_COUNT: usize = 6;
pub const EXTENDED_FEATURE_COUNT: usize = 10;

/// Which layout a deployed artifact was trained on.
/// Exactly one is active per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureSchema {
    Basic,
    Extended,
}

impl FeatureSchema {
    pub fn layout(self) -> &'static [&'static str] {
        match self {
            FeatureSchema::Basic => BASIC_LAYOUT,
            FeatureSchema::Extended => EXTENDED_LAYOUT,
        }
    }

    pub fn feature_count(self) -> usize {
        match self {
            FeatureSchema::Basic => BASIC_FEATURE_COUNT,
            FeatureSchema::Extended => EXTENDED_FEATURE_COUNT,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FeatureSchema::Basic => "basic",
            FeatureSchema::Extended => "extended",
        }
    }

    /// Parse a schema name. Accepts `basic`/`extended` in any case, or the
    /// feature counts `6`/`10`.
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "basic" | "6" => Ok(FeatureSchema::Basic),
            "extended" | "10" => Ok(FeatureSchema::Extended),
            other => Err(HazardError::Config(format!(
                "Unknown feature schema '{}' (expected 'basic' or 'extended')",
                other
            ))),
        }
    }

    /// Schema with the given width, if any
    pub fn for_width(width: usize) -> Option<Self> {
        match width {
            BASIC_FEATURE_COUNT => Some(FeatureSchema::Basic),
            EXTENDED_FEATURE_COUNT => Some(FeatureSchema::Extended),
            _ => None,
        }
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        FeatureSchema::Extended
    }
}

impl std::fmt::Display for FeatureSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for FeatureSchema {
    type Err = HazardError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 over version, schema name and ordered feature names
pub fn compute_layout_hash(schema: FeatureSchema) -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);
    hasher.update(schema.name().as_bytes());
    hasher.update(&[0]);

    for name in schema.layout() {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

pub fn layout_hash(schema: FeatureSchema) -> u32 {
    compute_layout_hash(schema)
}

// ============================================================================
// LAYOUT INFO
// ============================================================================

/// Complete layout information for serialization/logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub schema: FeatureSchema,
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
}

impl LayoutInfo {
    pub fn for_schema(schema: FeatureSchema) -> Self {
        Self {
            schema,
            version: FEATURE_VERSION,
            hash: layout_hash(schema),
            feature_count: schema.feature_count(),
            feature_names: schema.layout().iter().map(|s| s.to_string()).collect(),
        }
    }
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Validate that incoming data matches the schema's current layout
pub fn validate_layout(schema: FeatureSchema, incoming_version: u8, incoming_hash: u32) -> Result<()> {
    let current_hash = layout_hash(schema);

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(HazardError::LayoutMismatch {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

/// Check a list of externally declared feature names against a schema.
/// Order matters.
pub fn validate_feature_names(schema: FeatureSchema, names: &[String]) -> Result<()> {
    let layout = schema.layout();

    if names.len() != layout.len() {
        return Err(HazardError::SchemaMismatch(format!(
            "artifact declares {} features, {} schema has {}",
            names.len(),
            schema,
            layout.len()
        )));
    }

    for (i, (declared, expected)) in names.iter().zip(layout.iter()).enumerate() {
        if declared != expected {
            return Err(HazardError::SchemaMismatch(format!(
                "feature {} is '{}' in artifact, '{}' in {} schema",
                i, declared, expected, schema
            )));
        }
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

pub fn feature_index(schema: FeatureSchema, name: &str) -> Option<usize> {
    schema.layout().iter().position(|&n| n == name)
}

pub fn feature_name(schema: FeatureSchema, index: usize) -> Option<&'static str> {
    schema.layout().get(index).copied()
}

// ============================================================================
// TESTS
// ============================================================================
