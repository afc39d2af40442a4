use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use tracing::warn;

use crate::algorithm::Algorithm;

/// Lifetime in seconds used when neither the configuration nor the caller sets one
pub const DEFAULT_LIFETIME: i64 = 3600;

/// Configuration shared by the token generator and validator
///
/// The configuration is immutable once built: the generator and validator each take
/// their own copy by value, so several instances never share mutable state.
///
/// An absent secret is represented as the empty string and is still a usable HMAC
/// key. The same holds for `null` entries in `old_secrets` when loading from JSON.
///
/// # Examples
///
/// ## Creating a configuration manually
///
/// ```
/// use tokenista_config::{TokenistaConfig, DEFAULT_LIFETIME};
///
/// let config = TokenistaConfig::new("our-secret");
/// assert_eq!(config.lifetime, DEFAULT_LIFETIME);
/// assert!(config.old_secrets.is_empty());
/// ```
///
/// ## Loading from a JSON file
///
/// ```no_run
/// use tokenista_config::TokenistaConfig;
///
/// let config = TokenistaConfig::from_file("./tokenista.json")
///     .expect("Failed to load configuration");
/// ```
///
/// ## Loading from environment variables
///
/// ```no_run
/// use tokenista_config::TokenistaConfig;
///
/// // TOKENISTA_SECRET=our-secret
/// // TOKENISTA_OLD_SECRETS=older-secret,oldest-secret
/// // TOKENISTA_LIFETIME=900
/// let config = TokenistaConfig::from_env("TOKENISTA")
///     .expect("Failed to load configuration from environment");
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenistaConfig {
    /// The secret new tokens are signed with
    #[serde(default, deserialize_with = "nullable_secret")]
    pub secret: String,
    /// Retired secrets that are still accepted when validating, tried in order
    /// after the current secret
    #[serde(default, deserialize_with = "nullable_secrets")]
    pub old_secrets: Vec<String>,
    /// Default token lifetime in seconds
    #[serde(default = "default_lifetime")]
    pub lifetime: i64,
    #[serde(default)]
    pub algorithm: Algorithm,
}

fn default_lifetime() -> i64 {
    DEFAULT_LIFETIME
}

fn nullable_secret<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn nullable_secrets<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let secrets = Option::<Vec<Option<String>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(secrets.into_iter().map(Option::unwrap_or_default).collect())
}

// Secrets stay out of logs and panic messages.
impl fmt::Debug for TokenistaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenistaConfig")
            .field("secret", &"<redacted>")
            .field("old_secrets", &format_args!("<{} redacted>", self.old_secrets.len()))
            .field("lifetime", &self.lifetime)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl Default for TokenistaConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            old_secrets: Vec::new(),
            lifetime: DEFAULT_LIFETIME,
            algorithm: Algorithm::default(),
        }
    }
}

/// Settings that are legal but almost always an integration mistake
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// Every token generated without an explicit lifetime is already expired
    NonPositiveLifetime(i64),
    /// The current secret is empty
    EmptySecret,
    /// The current secret is also listed as a retired secret
    SecretAlsoRetired,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::NonPositiveLifetime(lifetime) => write!(
                f,
                "default lifetime is {} seconds, tokens generated without an explicit lifetime will be expired immediately",
                lifetime
            ),
            ConfigWarning::EmptySecret => write!(f, "signing secret is empty"),
            ConfigWarning::SecretAlsoRetired => {
                write!(f, "current secret is also listed in old_secrets")
            }
        }
    }
}

impl TokenistaConfig {
    /// Create a configuration with the given secret and default options
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Self::default()
        }
    }

    pub fn builder() -> TokenistaConfigBuilder {
        TokenistaConfigBuilder::new()
    }

    /// Convert this configuration to a builder for modification
    pub fn to_builder(&self) -> TokenistaConfigBuilder {
        TokenistaConfigBuilder::from_config(self)
    }

    /// All secrets accepted during validation: the current one first, then the retired ones
    pub fn verification_secrets(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.secret.as_str()).chain(self.old_secrets.iter().map(String::as_str))
    }

    /// Inspect the configuration for legal but suspicious settings.
    ///
    /// None of these prevent the configuration from being used.
    pub fn warnings(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        if self.lifetime <= 0 {
            warnings.push(ConfigWarning::NonPositiveLifetime(self.lifetime));
        }
        if self.secret.is_empty() {
            warnings.push(ConfigWarning::EmptySecret);
        }
        if self.old_secrets.iter().any(|old| old == &self.secret) {
            warnings.push(ConfigWarning::SecretAlsoRetired);
        }
        warnings
    }

    pub(crate) fn log_warnings(&self) {
        for warning in self.warnings() {
            warn!("tokenista configuration: {}", warning);
        }
    }
}

/// Builder for TokenistaConfig
///
/// Unset fields fall back to the defaults of [`TokenistaConfig::default`].
///
/// ```
/// use tokenista_config::{Algorithm, TokenistaConfig};
///
/// let config = TokenistaConfig::builder()
///     .secret("new-secret")
///     .old_secrets(["older-secret", "oldest-secret"])
///     .algorithm(Algorithm::Sha256)
///     .build();
///
/// let rotated = config.to_builder().lifetime(60).build();
/// assert_eq!(rotated.old_secrets.len(), 2);
/// assert_eq!(rotated.lifetime, 60);
/// ```
#[derive(Default)]
pub struct TokenistaConfigBuilder {
    secret: Option<String>,
    old_secrets: Vec<String>,
    lifetime: Option<i64>,
    algorithm: Option<Algorithm>,
}

impl TokenistaConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &TokenistaConfig) -> Self {
        Self {
            secret: Some(config.secret.clone()),
            old_secrets: config.old_secrets.clone(),
            lifetime: Some(config.lifetime),
            algorithm: Some(config.algorithm),
        }
    }

    /// Set the secret new tokens are signed with
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Append a retired secret that validation should still accept
    pub fn old_secret(mut self, secret: impl Into<String>) -> Self {
        self.old_secrets.push(secret.into());
        self
    }

    /// Replace the list of retired secrets
    pub fn old_secrets<I, S>(mut self, secrets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.old_secrets = secrets.into_iter().map(Into::into).collect();
        self
    }

    /// Set the default token lifetime in seconds
    pub fn lifetime(mut self, seconds: i64) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = Some(algorithm);
        self
    }

    /// Build the TokenistaConfig, logging any [`ConfigWarning`]s
    pub fn build(self) -> TokenistaConfig {
        let config = TokenistaConfig {
            secret: self.secret.unwrap_or_default(),
            old_secrets: self.old_secrets,
            lifetime: self.lifetime.unwrap_or(DEFAULT_LIFETIME),
            algorithm: self.algorithm.unwrap_or_default(),
        };
        config.log_warnings();
        config
    }
}
