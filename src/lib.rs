//! # Tokenista
//!
//! Generate and validate compact, tamper-evident, expiring tokens without storing them.
//!
//! Tokens are signed with an HMAC over a random payload, an expiry timestamp and any
//! extra values the caller binds them to. Validation recomputes the signature, so
//! the only state is the immutable secret configuration. Typical uses are email
//! confirmation and password reset links, or short-lived API handshakes.
//!
//! ## Usage
//!
//! ```
//! use tokenista::{ExtraValues, Tokenista};
//!
//! # fn main() -> Result<(), tokenista::TokenError> {
//! let tokenista = Tokenista::new("our-secret");
//! let email = ExtraValues::from([("email".to_string(), "user@example.com".to_string())]);
//!
//! let token = tokenista.generate(Some(3600), &email)?;
//!
//! let result = tokenista.validate(&token, &email);
//! assert!(result.is_valid());
//!
//! let result = tokenista.validate(&token, &ExtraValues::new());
//! assert_eq!(result.status_codes(), "tampered");
//! # Ok(())
//! # }
//! ```
//!
//! ## Secret rotation
//!
//! Move the current secret into `old_secrets` when introducing a new one. Tokens
//! signed with a listed old secret keep validating until they expire; once a secret
//! is removed from the configuration every token signed with it reads as tampered.
//!
//! ```
//! use tokenista::{ExtraValues, Tokenista, TokenistaConfig};
//!
//! # fn main() -> Result<(), tokenista::TokenError> {
//! let old = Tokenista::new("older-secret");
//! let token = old.generate(None, &ExtraValues::new())?;
//!
//! let rotated = Tokenista::with_config(
//!     TokenistaConfig::builder()
//!         .secret("new-secret")
//!         .old_secret("older-secret")
//!         .build(),
//! );
//! assert!(rotated.validate(&token, &ExtraValues::new()).is_valid());
//! # Ok(())
//! # }
//! ```
//!
//! Tokens are not single use. A token validates the same way every time it is
//! presented until it expires, and there is no way to revoke a single token.

pub use tokenista_config::{
    try_load_default_config, Algorithm, ConfigError, ConfigWarning, TokenistaConfig,
    TokenistaConfigBuilder, DEFAULT_LIFETIME,
};
pub use tokenista_token::{
    canonical_json, parse_token, sign_token, signing_string, ExtraValues, Reason,
    TokenError, TokenGenerator, TokenParts, TokenValidator, ValidationResult, VALID,
};

/// Issues and validates tokens for a single secret configuration
///
/// A `Tokenista` is immutable and holds no shared state, so one instance can be used
/// from many threads at once.
#[derive(Debug, Clone)]
pub struct Tokenista {
    generator: TokenGenerator,
    validator: TokenValidator,
}

impl Tokenista {
    /// Create an instance signing with `secret` and the default options
    ///
    /// The secret may be empty; it is still used as the HMAC key.
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_config(TokenistaConfig::new(secret))
    }

    pub fn with_config(config: TokenistaConfig) -> Self {
        Self {
            generator: TokenGenerator::new(config.clone()),
            validator: TokenValidator::new(config),
        }
    }

    /// Create an instance from the first configuration found in the standard
    /// locations, see [`try_load_default_config`]
    pub fn from_default_config() -> Option<Self> {
        try_load_default_config().map(Self::with_config)
    }

    pub fn config(&self) -> &TokenistaConfig {
        self.validator.config()
    }

    /// Generate a token
    ///
    /// # Arguments
    ///
    /// * `lifetime` - Seconds until expiry, or `None` for the configured default
    /// * `extra_values` - Values that must be presented again for the token to validate
    pub fn generate(
        &self,
        lifetime: Option<i64>,
        extra_values: &ExtraValues,
    ) -> Result<String, TokenError> {
        self.generator.generate(lifetime, extra_values)
    }

    /// Generate a token as if the current time were `now` (Unix seconds)
    pub fn generate_at(
        &self,
        now: i64,
        lifetime: Option<i64>,
        extra_values: &ExtraValues,
    ) -> Result<String, TokenError> {
        self.generator.generate_at(now, lifetime, extra_values)
    }

    /// Validate a token, reporting tampering and expiry independently
    pub fn validate(&self, token: &str, extra_values: &ExtraValues) -> ValidationResult {
        self.validator.validate(token, extra_values)
    }

    /// Validate a token as if the current time were `now` (Unix seconds)
    pub fn validate_at(&self, token: &str, extra_values: &ExtraValues, now: i64) -> ValidationResult {
        self.validator.validate_at(token, extra_values, now)
    }

    #[deprecated(note = "use `validate(..).is_valid()`")]
    pub fn is_valid(&self, token: &str, extra_values: &ExtraValues) -> bool {
        self.validate(token, extra_values).is_valid()
    }

    #[deprecated(note = "use `validate(..).is_tampered()`")]
    pub fn is_tampered(&self, token: &str, extra_values: &ExtraValues) -> bool {
        self.validate(token, extra_values).is_tampered()
    }

    /// Expiry does not depend on extra values, so none are taken
    #[deprecated(note = "use `validate(..).is_expired()`")]
    pub fn is_expired(&self, token: &str) -> bool {
        self.validate(token, &ExtraValues::new()).is_expired()
    }
}

impl From<TokenistaConfig> for Tokenista {
    fn from(config: TokenistaConfig) -> Self {
        Self::with_config(config)
    }
}
