use chrono::Utc;
use tracing::debug;

use tokenista_config::TokenistaConfig;

use crate::result::ValidationResult;
use crate::sign::{decode_signature, signing_string, verify_tag, ExtraValues};
use crate::token::TokenParts;

/// Validates tokens against the current and retired secrets
///
/// Validation is stateless: the same token validates the same way every time it
/// is presented until it expires. There is no single-use enforcement and no way to
/// revoke one token; rotating the secret out of the configuration invalidates every
/// token signed with it.
///
/// ```
/// use tokenista_config::TokenistaConfig;
/// use tokenista_token::{ExtraValues, TokenGenerator, TokenValidator};
///
/// let config = TokenistaConfig::new("our-secret");
/// let token = TokenGenerator::new(config.clone())
///     .generate(Some(3600), &ExtraValues::new())
///     .unwrap();
///
/// let result = TokenValidator::new(config).validate(&token, &ExtraValues::new());
/// assert!(result.is_valid());
/// assert_eq!(result.status_codes(), "valid");
/// ```
#[derive(Debug, Clone)]
pub struct TokenValidator {
    config: TokenistaConfig,
}

impl TokenValidator {
    pub fn new(config: TokenistaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TokenistaConfig {
        &self.config
    }

    /// Validate a token string against the current time
    ///
    /// # Arguments
    ///
    /// * `token` - The token string, in any form; malformed input is reported as
    ///   tampered and expired
    /// * `extra_values` - The values the token is expected to be bound to
    pub fn validate(&self, token: &str, extra_values: &ExtraValues) -> ValidationResult {
        self.validate_at(token, extra_values, Utc::now().timestamp())
    }

    /// Validate a token as if the current time were `now` (Unix seconds)
    ///
    /// A token is expired when `now` is at or past its expiry.
    pub fn validate_at(
        &self,
        token: &str,
        extra_values: &ExtraValues,
        now: i64,
    ) -> ValidationResult {
        let parts = TokenParts::parse(token);
        let expiry = parts.expiry_timestamp();

        let tampered = !self.signature_matches(&parts, extra_values);
        let expired = now >= expiry;

        let result = ValidationResult::new(tampered, expired, expiry);
        debug!(status = %result, expiry, "validated token");
        result
    }

    fn signature_matches(&self, parts: &TokenParts<'_>, extra_values: &ExtraValues) -> bool {
        let algorithm = self.config.algorithm;
        let Some(tag) = decode_signature(parts.signature, algorithm) else {
            return false;
        };
        let Ok(sign_string) = signing_string(parts.payload, parts.expiry, extra_values) else {
            return false;
        };

        match self
            .config
            .verification_secrets()
            .position(|secret| verify_tag(&sign_string, secret, algorithm, &tag))
        {
            Some(0) => true,
            Some(index) => {
                debug!(retired_secret = index - 1, "token signed with a retired secret");
                true
            }
            None => false,
        }
    }
}
