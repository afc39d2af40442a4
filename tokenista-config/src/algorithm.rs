use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// HMAC digest used to sign tokens.
///
/// `Sha1` is the default and the only algorithm understood by previously issued
/// tokens; switching algorithm invalidates every outstanding token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[default]
    #[serde(rename = "sha1", alias = "hmac-sha1")]
    Sha1,
    #[serde(rename = "sha256", alias = "hmac-sha256")]
    Sha256,
}

impl Algorithm {
    /// Number of lowercase hex characters in a signature produced by this algorithm
    pub fn signature_len(&self) -> usize {
        match self {
            Algorithm::Sha1 => 40,
            Algorithm::Sha256 => 64,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sha1" | "hmac-sha1" => Ok(Algorithm::Sha1),
            "sha256" | "hmac-sha256" => Ok(Algorithm::Sha256),
            _ => Err(ConfigError::UnknownAlgorithm(s.to_string())),
        }
    }
}
