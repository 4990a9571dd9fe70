//! NEO Hazard - CLI Entry Point
//!
//! Stand-in for the presentation layer: collects fields, runs one
//! encode → predict → format pass, prints the result.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use neo_hazard_core::constants::{APP_NAME, APP_VERSION, ENV_FEATURE_SCHEMA, ENV_MODEL_PATH};
use neo_hazard_core::{
    AsteroidInput, Config, ExtendedFeatures, FeatureSchema, HazardEngine, LayoutInfo, OrbitingBody,
};

/// Predict whether a near-earth object is hazardous
#[derive(Parser, Debug)]
#[command(name = "neo-hazard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct CliArgs {
    /// Classifier artifact (.json forest or .onnx)
    #[arg(long, global = true, env = ENV_MODEL_PATH)]
    model: Option<PathBuf>,

    /// Feature schema the artifact was trained on (basic | extended)
    #[arg(long, global = true, env = ENV_FEATURE_SCHEMA)]
    schema: Option<FeatureSchema>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Predict hazard for one asteroid
    Predict(PredictArgs),

    /// Print the feature layout of a schema
    Layout,

    /// Load the artifact and print engine status
    Status,
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Read the asteroid record from a JSON file instead of flags
    #[arg(long)]
    input: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    #[arg(long, default_value_t = 22.0)]
    absolute_magnitude: f32,

    #[arg(long, default_value_t = 0.1)]
    diameter_min: f32,

    #[arg(long, default_value_t = 0.2)]
    diameter_max: f32,

    /// Earth, Jupiter, Mars, Venus or Other; anything else counts as Other
    #[arg(long, default_value = "Earth")]
    orbiting_body: String,

    /// km/s
    #[arg(long, default_value_t = 25.0)]
    velocity: f32,

    /// km
    #[arg(long, default_value_t = 500_000.0)]
    miss_distance: f32,

    #[arg(long, default_value_t = 0.15)]
    diameter_mean: f32,

    #[arg(long, default_value_t = 100.0)]
    velocity_diameter_ratio: f32,

    #[arg(long, default_value_t = 5.7)]
    log_miss_distance: f32,

    #[arg(long, default_value_t = 50.0)]
    threat_score: f32,
}

impl PredictArgs {
    fn to_input(&self) -> anyhow::Result<AsteroidInput> {
        if let Some(path) = &self.input {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            return serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", path.display()));
        }

        Ok(AsteroidInput {
            absolute_magnitude: self.absolute_magnitude,
            diameter_min_km: self.diameter_min,
            diameter_max_km: self.diameter_max,
            orbiting_body: OrbitingBody::from_label(&self.orbiting_body),
            relative_velocity_kms: self.velocity,
            miss_distance_km: self.miss_distance,
            extended: ExtendedFeatures {
                diameter_mean_km: Some(self.diameter_mean),
                velocity_diameter_ratio: Some(self.velocity_diameter_ratio),
                log_miss_distance: Some(self.log_miss_distance),
                threat_score: Some(self.threat_score),
            },
        })
    }
}

fn load_config(args: &CliArgs) -> anyhow::Result<Config> {
    let mut config = Config::from_env().context("invalid configuration")?;
    if let Some(model) = &args.model {
        config.model_path = model.clone();
    }
    if let Some(schema) = args.schema {
        config.schema = schema;
    }
    Ok(config)
}

fn load_engine(config: &Config) -> anyhow::Result<HazardEngine> {
    HazardEngine::load(config)
        .with_context(|| format!("failed to load classifier {}", config.model_path.display()))
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = CliArgs::parse();
    log::info!("Starting {} v{}", APP_NAME, APP_VERSION);

    let config = load_config(&args)?;

    match &args.command {
        Command::Layout => {
            let info = LayoutInfo::for_schema(config.schema);
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Status => {
            let engine = load_engine(&config)?;
            println!("{}", serde_json::to_string_pretty(&engine.status())?);
        }
        Command::Predict(predict) => {
            let engine = load_engine(&config)?;
            let input = predict.to_input()?;
            let report = engine.assess(&input).context("prediction failed")?;

            if predict.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.headline());
                println!("{}", report.risk.message());
            }
        }
    }

    Ok(())
}
