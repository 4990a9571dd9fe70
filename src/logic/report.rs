//! Result formatting for the presentation layer.

use serde::{Deserialize, Serialize};

use crate::logic::model::HazardLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskText {
    Hazardous,
    Safe,
}

impl RiskText {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskText::Hazardous => "Hazardous",
            RiskText::Safe => "Safe",
        }
    }

    /// Banner line shown under the percentage
    pub fn message(self) -> &'static str {
        match self {
            RiskText::Hazardous => "Hazardous Asteroid!",
            RiskText::Safe => "Safe Asteroid",
        }
    }
}

impl From<HazardLabel> for RiskText {
    fn from(label: HazardLabel) -> Self {
        match label {
            HazardLabel::Hazardous => RiskText::Hazardous,
            HazardLabel::Safe => RiskText::Safe,
        }
    }
}

impl std::fmt::Display for RiskText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the presentation layer renders
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactReport {
    /// Hazardous probability as a percentage, 2 decimals
    pub impact_percent: f64,
    pub risk: RiskText,
}

impl ImpactReport {
    pub fn headline(&self) -> String {
        format!("Chance of Earth Impact: {}%", self.impact_percent)
    }
}

/// Round to 2 decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Pure formatting: no state, no I/O
pub fn format_result(label: HazardLabel, probability: f64) -> ImpactReport {
    ImpactReport {
        impact_percent: round2(probability * 100.0),
        risk: RiskText::from(label),
    }
}
