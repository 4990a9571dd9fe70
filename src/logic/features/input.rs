//! Raw asteroid input as supplied by the presentation layer.
//!
//! Defaults mirror the form defaults the classifier was demoed with.

use serde::{Deserialize, Serialize};

use super::orbiting::OrbitingBody;
use crate::error::{HazardError, Result};

/// Engineered fields only the extended schema consumes.
///
/// Each field is tracked on its own so a record that supplies three of the
/// four still reports the absent one by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtendedFeatures {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter_mean_km: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity_diameter_ratio: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_miss_distance: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threat_score: Option<f32>,
}

impl ExtendedFeatures {
    /// All four fields set to the form defaults
    pub fn form_defaults() -> Self {
        Self {
            diameter_mean_km: Some(0.15),
            velocity_diameter_ratio: Some(100.0),
            log_miss_distance: Some(5.7),
            threat_score: Some(50.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.diameter_mean_km.is_none()
            && self.velocity_diameter_ratio.is_none()
            && self.log_miss_distance.is_none()
            && self.threat_score.is_none()
    }

    /// Fill absent fields from the form defaults
    pub fn or_defaults(self) -> Self {
        let defaults = Self::form_defaults();
        Self {
            diameter_mean_km: self.diameter_mean_km.or(defaults.diameter_mean_km),
            velocity_diameter_ratio: self.velocity_diameter_ratio.or(defaults.velocity_diameter_ratio),
            log_miss_distance: self.log_miss_distance.or(defaults.log_miss_distance),
            threat_score: self.threat_score.or(defaults.threat_score),
        }
    }

    /// Values in layout order, or the first absent field
    pub fn values(&self) -> Result<[f32; 4]> {
        Ok([
            self.diameter_mean_km.ok_or(HazardError::MissingFeature("diameter_mean_km"))?,
            self.velocity_diameter_ratio
                .ok_or(HazardError::MissingFeature("velocity_diameter_ratio"))?,
            self.log_miss_distance.ok_or(HazardError::MissingFeature("log_miss_distance"))?,
            self.threat_score.ok_or(HazardError::MissingFeature("threat_score"))?,
        ])
    }
}

/// One user submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidInput {
    pub absolute_magnitude: f32,
    pub diameter_min_km: f32,
    pub diameter_max_km: f32,
    pub orbiting_body: OrbitingBody,
    pub relative_velocity_kms: f32,
    pub miss_distance_km: f32,
    #[serde(flatten)]
    pub extended: ExtendedFeatures,
}

impl Default for AsteroidInput {
    fn default() -> Self {
        Self {
            absolute_magnitude: 22.0,
            diameter_min_km: 0.1,
            diameter_max_km: 0.2,
            orbiting_body: OrbitingBody::Earth,
            relative_velocity_kms: 25.0,
            miss_distance_km: 500_000.0,
            extended: ExtendedFeatures::default(),
        }
    }
}

impl AsteroidInput {
    pub fn with_extended(mut self, extended: ExtendedFeatures) -> Self {
        self.extended = extended;
        self
    }

    /// Build from `(field, raw string)` pairs, as a form would post them.
    ///
    /// Fields not present keep their defaults. Numeric fields are coerced
    /// with `parse_field`; `orbiting_body` goes through the total label
    /// lookup. Any extended field present switches on the extended block.
    pub fn from_named_fields<'a, I>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut input = AsteroidInput::default();
        let mut extended = ExtendedFeatures::default();

        for (name, raw) in fields {
            match name {
                "absolute_magnitude" => input.absolute_magnitude = parse_field(name, raw)?,
                "diameter_min_km" => input.diameter_min_km = parse_field(name, raw)?,
                "diameter_max_km" => input.diameter_max_km = parse_field(name, raw)?,
                "orbiting_body" => input.orbiting_body = OrbitingBody::from_label(raw),
                "relative_velocity_kms" => input.relative_velocity_kms = parse_field(name, raw)?,
                "miss_distance_km" => input.miss_distance_km = parse_field(name, raw)?,
                "diameter_mean_km" => extended.diameter_mean_km = Some(parse_field(name, raw)?),
                "velocity_diameter_ratio" => {
                    extended.velocity_diameter_ratio = Some(parse_field(name, raw)?)
                }
                "log_miss_distance" => extended.log_miss_distance = Some(parse_field(name, raw)?),
                "threat_score" => extended.threat_score = Some(parse_field(name, raw)?),
                unknown => {
                    return Err(HazardError::invalid_value(unknown, format!("{} (unknown field)", raw)));
                }
            }
        }

        if !extended.is_empty() {
            input.extended = extended.or_defaults();
        }
        Ok(input)
    }
}

/// Coerce a raw form value to a finite f32
pub fn parse_field(field: &str, raw: &str) -> Result<f32> {
    let value: f32 = raw
        .trim()
        .parse()
        .map_err(|_| HazardError::invalid_value(field, raw))?;

    if !value.is_finite() {
        return Err(HazardError::invalid_value(field, raw));
    }

    Ok(value)
}
