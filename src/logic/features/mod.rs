//! Features Module - Feature Encoding
//!
//! Turns raw asteroid fields into the fixed-order vector the classifier
//! was trained on. Order and categorical codes live here and nowhere else.

pub mod input;
pub mod layout;
pub mod orbiting;
pub mod vector;

#[cfg(test)]
mod tests;

// Re-export common types
pub use input::{AsteroidInput, ExtendedFeatures};
pub use layout::{FeatureSchema, LayoutInfo, FEATURE_VERSION};
pub use orbiting::{encode_orbiting_body, OrbitingBody};
pub use vector::{assemble_vector, FeatureVector};
