use thiserror::Error;

/// Errors raised while issuing tokens.
///
/// Validation never produces a `TokenError`: malformed, tampered and expired tokens
/// are reported through [`crate::ValidationResult`].
#[derive(Error, Debug)]
pub enum TokenError {
    /// The secure random source could not produce a payload
    #[error("Secure random source failed: {0}")]
    Randomness(String),

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    #[error("Token error: {0}")]
    Generic(String),
}

impl TokenError {
    pub fn randomness<S: Into<String>>(message: S) -> Self {
        TokenError::Randomness(message.into())
    }

    pub fn invalid_key<S: Into<String>>(message: S) -> Self {
        TokenError::InvalidKey(message.into())
    }

    pub fn generic<S: Into<String>>(message: S) -> Self {
        TokenError::Generic(message.into())
    }
}

impl From<serde_json::Error> for TokenError {
    fn from(error: serde_json::Error) -> Self {
        TokenError::Generic(format!("Failed to encode extra values: {}", error))
    }
}
