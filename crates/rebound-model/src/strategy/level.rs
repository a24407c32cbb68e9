use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[cfg(feature = "schema")]
use schemars::JsonSchema;

use crate::error::{ModelError, ModelResult};

/// Verbosity at which retried attempts are reported.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "schema", derive(JsonSchema))]
#[cfg_attr(feature = "schema", schemars(rename_all = "lowercase"))]
pub enum AttemptLevel {
    Trace,
    #[default]
    Debug,
    Info,
    Warn,
    Error,
}

impl AttemptLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttemptLevel::Trace => "trace",
            AttemptLevel::Debug => "debug",
            AttemptLevel::Info => "info",
            AttemptLevel::Warn => "warn",
            AttemptLevel::Error => "error",
        }
    }
}

impl FromStr for AttemptLevel {
    type Err = ModelError;
    fn from_str(s: &str) -> ModelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(AttemptLevel::Trace),
            "" | "debug" => Ok(AttemptLevel::Debug),
            "info" => Ok(AttemptLevel::Info),
            "warn" | "warning" => Ok(AttemptLevel::Warn),
            "error" => Ok(AttemptLevel::Error),
            other => Err(ModelError::UnknownLevel(other.to_string())),
        }
    }
}

impl fmt::Display for AttemptLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AttemptLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AttemptLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
