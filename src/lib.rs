//! NEO Hazard Core - Feature Encoder & Inference Adapter
//!
//! Encodes asteroid observations into the fixed-order vector a pre-trained
//! hazard classifier expects, runs the classifier, and formats the result.
//!
//! ```no_run
//! use neo_hazard_core::{AsteroidInput, Config, HazardEngine};
//!
//! let engine = HazardEngine::load(&Config::from_env()?)?;
//! let report = engine.assess(&AsteroidInput::default())?;
//! println!("{} ({})", report.headline(), report.risk);
//! # Ok::<(), neo_hazard_core::HazardError>(())
//! ```

pub mod constants;
pub mod error;
pub mod logic;

pub use error::{HazardError, Result};
pub use logic::config::Config;
pub use logic::features::{
    assemble_vector, encode_orbiting_body, AsteroidInput, ExtendedFeatures, FeatureSchema,
    FeatureVector, LayoutInfo, OrbitingBody,
};
pub use logic::model::{
    EngineStatus, ForestClassifier, HazardClassifier, HazardEngine, HazardLabel, OnnxClassifier,
    PredictionResult,
};
pub use logic::report::{format_result, ImpactReport, RiskText};
