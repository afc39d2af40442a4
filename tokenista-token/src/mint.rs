use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use rand::rngs::OsRng;
use rand::TryRngCore;
use tracing::debug;

use tokenista_config::TokenistaConfig;

use crate::error::TokenError;
use crate::sign::{sign_token, ExtraValues};

/// Number of random bytes in a token payload (16 base64 characters)
pub const PAYLOAD_BYTES: usize = 12;

/// Issues signed tokens of the form `payload-expiry-signature`
///
/// New tokens are always signed with the current secret; retired secrets are only
/// ever consulted by the validator.
///
/// ```
/// use tokenista_config::TokenistaConfig;
/// use tokenista_token::{ExtraValues, TokenGenerator};
///
/// let generator = TokenGenerator::new(TokenistaConfig::new("our-secret"));
/// let token = generator.generate(None, &ExtraValues::new()).unwrap();
/// assert_eq!(token.split('-').count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    config: TokenistaConfig,
}

impl TokenGenerator {
    pub fn new(config: TokenistaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TokenistaConfig {
        &self.config
    }

    /// Generate a token expiring `lifetime` seconds from now
    ///
    /// # Arguments
    ///
    /// * `lifetime` - Seconds until expiry, or `None` for the configured default.
    ///   Zero or negative lifetimes produce tokens that are already expired.
    /// * `extra_values` - Values the token is bound to; validation only succeeds when
    ///   the same values are presented again
    ///
    /// # Errors
    ///
    /// Returns `TokenError::Randomness` if the operating system's secure random source
    /// fails. No token can be issued in that case.
    pub fn generate(
        &self,
        lifetime: Option<i64>,
        extra_values: &ExtraValues,
    ) -> Result<String, TokenError> {
        self.generate_at(Utc::now().timestamp(), lifetime, extra_values)
    }

    /// Generate a token as if the current time were `now` (Unix seconds)
    pub fn generate_at(
        &self,
        now: i64,
        lifetime: Option<i64>,
        extra_values: &ExtraValues,
    ) -> Result<String, TokenError> {
        let lifetime = lifetime.unwrap_or(self.config.lifetime);
        let expiry = now.saturating_add(lifetime);
        let payload = random_payload()?;
        let signature = sign_token(
            &payload,
            expiry,
            extra_values,
            &self.config.secret,
            self.config.algorithm,
        )?;

        debug!(
            expiry,
            lifetime,
            extra_values = extra_values.len(),
            algorithm = %self.config.algorithm,
            "issued token"
        );

        Ok(format!("{}-{}-{}", payload, expiry, signature))
    }
}

/// Fresh random payload: [`PAYLOAD_BYTES`] bytes from the OS source, standard base64
pub fn random_payload() -> Result<String, TokenError> {
    let mut bytes = [0u8; PAYLOAD_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| TokenError::randomness(e.to_string()))?;
    Ok(STANDARD.encode(bytes))
}
