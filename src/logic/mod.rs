//! Logic Module - Encoding & Inference
//!
//! - `features/` - Raw input, categorical encoding, ordered feature vectors
//! - `model/` - Classifier backends, artifact loading, inference engine
//! - `report` - Formatting results for display

pub mod config;
pub mod features;
pub mod model;
pub mod report;
