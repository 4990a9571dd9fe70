//! Orbiting Body Code - categorical encoding
//!
//! Codes must match the label encoding used at training time:
//! alphabetical order of the known bodies, with `Other` last.

use serde::{Deserialize, Serialize};

/// Closed set of orbiting bodies the classifier was trained on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrbitingBody {
    Earth = 0,
    Jupiter = 1,
    Mars = 2,
    Venus = 3,
    Other = 4,
}

/// (label, body) in code order
pub const ORBITING_TABLE: &[(&str, OrbitingBody)] = &[
    ("Earth", OrbitingBody::Earth),
    ("Jupiter", OrbitingBody::Jupiter),
    ("Mars", OrbitingBody::Mars),
    ("Venus", OrbitingBody::Venus),
    ("Other", OrbitingBody::Other),
];

impl OrbitingBody {
    /// Total lookup. Unknown labels fall back to `Other`.
    pub fn from_label(label: &str) -> Self {
        match ORBITING_TABLE.iter().find(|(name, _)| *name == label) {
            Some((_, body)) => *body,
            None => {
                log::debug!("Unrecognized orbiting body '{}', encoding as Other", label);
                OrbitingBody::Other
            }
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            OrbitingBody::Earth => "Earth",
            OrbitingBody::Jupiter => "Jupiter",
            OrbitingBody::Mars => "Mars",
            OrbitingBody::Venus => "Venus",
            OrbitingBody::Other => "Other",
        }
    }
}

impl Default for OrbitingBody {
    fn default() -> Self {
        OrbitingBody::Earth
    }
}

impl std::fmt::Display for OrbitingBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for OrbitingBody {
    fn from(label: &str) -> Self {
        Self::from_label(label)
    }
}

impl From<String> for OrbitingBody {
    fn from(label: String) -> Self {
        Self::from_label(&label)
    }
}

impl From<OrbitingBody> for String {
    fn from(body: OrbitingBody) -> Self {
        body.label().to_string()
    }
}

/// Encode an orbiting body label. Never fails.
pub fn encode_orbiting_body(label: &str) -> u8 {
    OrbitingBody::from_label(label).code()
}
