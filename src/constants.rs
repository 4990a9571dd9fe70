//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.

/// Default classifier artifact, relative to the working directory
pub const DEFAULT_MODEL_PATH: &str = "models/random_forest_asteroid_model.json";

/// Default feature schema name
pub const DEFAULT_FEATURE_SCHEMA: &str = "extended";

/// Environment variable names
pub const ENV_MODEL_PATH: &str = "NEO_MODEL_PATH";
pub const ENV_MODEL_METADATA: &str = "NEO_MODEL_METADATA";
pub const ENV_FEATURE_SCHEMA: &str = "NEO_FEATURE_SCHEMA";
pub const ENV_MODEL_SHA256: &str = "NEO_MODEL_SHA256";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "NEO Hazard";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get model path from environment or use default
pub fn get_model_path() -> String {
    std::env::var(ENV_MODEL_PATH)
        .unwrap_or_else(|_| DEFAULT_MODEL_PATH.to_string())
}

/// Get feature schema name from environment or use default
pub fn get_feature_schema() -> String {
    std::env::var(ENV_FEATURE_SCHEMA)
        .unwrap_or_else(|_| DEFAULT_FEATURE_SCHEMA.to_string())
}

/// Explicit sidecar metadata path, if set and non-empty
pub fn get_metadata_path() -> Option<String> {
    std::env::var(ENV_MODEL_METADATA)
        .ok()
        .filter(|s| !s.trim().is_empty())
}

/// Expected artifact checksum, if set and non-empty
pub fn get_expected_sha256() -> Option<String> {
    std::env::var(ENV_MODEL_SHA256)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
