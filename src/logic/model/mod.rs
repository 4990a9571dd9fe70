//! Model Module - Classifier Loading & Inference
//!
//! Tách logic inference khỏi feature encoding.
//! Backends sit behind `HazardClassifier`; the engine never sees which one.

pub mod classifier;
pub mod forest;
pub mod inference;
pub mod loader;
pub mod metadata;
pub mod onnx;


// Re-export common types
pub use classifier::{HazardClassifier, HazardLabel};
pub use forest::ForestClassifier;
pub use inference::{EngineStatus, HazardEngine, PredictionResult};
pub use loader::{load_classifier, LoadedModel};
pub use metadata::{ModelMetadata, SidecarMetadata};
pub use onnx::OnnxClassifier;
