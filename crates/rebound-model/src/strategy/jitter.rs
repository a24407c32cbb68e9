use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::error::{ModelError, ModelResult};

/// Controls the random spread applied to every retry delay.
///
/// Jitter is symmetric: a fraction `j` turns a delay `d` into a value drawn uniformly from
/// `[d * (1 - j), d * (1 + j)]`. Spreading retries this way keeps many callers that failed at
/// the same moment from hammering a dependency in lockstep.
///
/// Modes:
/// - `Default`: the executor's default fraction (12.5%).
/// - `Disabled`: no randomness, delays are exact.
/// - `Fraction(j)`: explicit fraction, must be within `[0, 1]`.
///
/// In config files the mode is either a string (`"default"`, `"disabled"`) or a bare number.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
pub enum JitterMode {
    /// Use the executor default.
    #[default]
    Default,
    /// Deterministic delays.
    Disabled,
    /// Explicit fraction of the delay.
    Fraction(f64),
}

impl JitterMode {
    /// Returns the explicit fraction, if any.
    pub fn fraction(&self) -> Option<f64> {
        match self {
            JitterMode::Fraction(f) => Some(*f),
            _ => None,
        }
    }
}

impl FromStr for JitterMode {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(JitterMode::Default),
            "none" | "off" | "disabled" => Ok(JitterMode::Disabled),
            other => other
                .parse::<f64>()
                .map(JitterMode::Fraction)
                .map_err(|_| ModelError::UnknownJitter(other.to_string())),
        }
    }
}

impl fmt::Display for JitterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JitterMode::Default => f.write_str("default"),
            JitterMode::Disabled => f.write_str("disabled"),
            JitterMode::Fraction(j) => write!(f, "{j}"),
        }
    }
}

impl Serialize for JitterMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            JitterMode::Fraction(j) => serializer.serialize_f64(*j),
            other => serializer.serialize_str(&other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for JitterMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(f64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(j) => Ok(JitterMode::Fraction(j)),
            Raw::Text(s) => Self::from_str(&s).map_err(serde::de::Error::custom),
        }
    }
}
