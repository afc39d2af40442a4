use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Status code reported for a token with no failure reasons
pub const VALID: &str = "valid";

/// Why a token failed validation.
///
/// Variants are ordered the way status codes are reported: tampered, then expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reason {
    /// The signature does not match under any configured secret and the given extra values
    Tampered,
    /// The current time is at or past the token's expiry
    Expired,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Tampered => "tampered",
            Reason::Expired => "expired",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of validating a token
///
/// Both checks always run, so a token can be reported as tampered and expired at
/// the same time. The expiry is whatever the token claims, even when the token
/// is invalid, and is the epoch when it could not be parsed.
///
/// ```
/// use tokenista_token::{Reason, ValidationResult};
///
/// let result = ValidationResult::new(true, true, 0);
/// assert!(!result.is_valid());
/// assert_eq!(result.status_codes(), "tampered,expired");
/// assert_eq!(result.reasons().collect::<Vec<_>>(), vec![Reason::Tampered, Reason::Expired]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    reasons: BTreeSet<Reason>,
    expiry: i64,
}

impl ValidationResult {
    pub fn new(tampered: bool, expired: bool, expiry: i64) -> Self {
        let mut reasons = BTreeSet::new();
        if tampered {
            reasons.insert(Reason::Tampered);
        }
        if expired {
            reasons.insert(Reason::Expired);
        }
        Self { reasons, expiry }
    }

    pub fn is_valid(&self) -> bool {
        self.reasons.is_empty()
    }

    pub fn is_expired(&self) -> bool {
        self.reasons.contains(&Reason::Expired)
    }

    pub fn is_tampered(&self) -> bool {
        self.reasons.contains(&Reason::Tampered)
    }

    /// Failure reasons, tampered before expired
    pub fn reasons(&self) -> impl Iterator<Item = Reason> + '_ {
        self.reasons.iter().copied()
    }

    /// `valid`, or the failure reasons joined by commas
    ///
    /// Useful to keep a single branch for invalid tokens while still logging or
    /// responding differently when a token merely expired.
    pub fn status_codes(&self) -> String {
        if self.reasons.is_empty() {
            return VALID.to_string();
        }
        self.reasons
            .iter()
            .map(Reason::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn token_expiry(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.expiry, 0).unwrap_or_default()
    }

    /// The token's expiry as a Unix timestamp
    pub fn expiry_timestamp(&self) -> i64 {
        self.expiry
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_codes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (false, false, "valid"),
            (false, true, "expired"),
            (true, false, "tampered"),
            (true, true, "tampered,expired"),
        ];
        for (tampered, expired, status) in cases {
            let result = ValidationResult::new(tampered, expired, 1_700_000_000);
            assert_eq!(result.status_codes(), status);
            assert_eq!(result.to_string(), status);
            assert_eq!(result.is_tampered(), tampered);
            assert_eq!(result.is_expired(), expired);
            assert_eq!(result.is_valid(), !tampered && !expired);
        }
    }

    #[test]
    fn test_token_expiry() {
        let result = ValidationResult::new(false, false, 1_700_000_000);
        assert_eq!(result.expiry_timestamp(), 1_700_000_000);
        assert_eq!(result.token_expiry().timestamp(), 1_700_000_000);

        let malformed = ValidationResult::new(true, true, 0);
        assert_eq!(malformed.token_expiry(), DateTime::<Utc>::default());
    }

    #[test]
    fn test_reason_serialization() {
        assert_eq!(serde_json::to_string(&Reason::Tampered).unwrap(), "\"tampered\"");
        let reason: Reason = serde_json::from_str("\"expired\"").unwrap();
        assert_eq!(reason, Reason::Expired);
    }
}
