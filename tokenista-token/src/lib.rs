//! # Tokenista Token
//!
//! Signing and validation core for Tokenista tokens.
//!
//! Tokens are opaque strings of the form `payload-expiry-signature`: a random
//! base64 payload, a Unix expiry timestamp and a hex HMAC over both (plus any extra
//! values the caller binds the token to). Nothing is stored when a token is issued;
//! validation recomputes the signature with the current secret and any retired
//! secrets still listed in the configuration.
//!
//! ## Features
//!
//! - Token generation with a configurable default lifetime
//! - Binding tokens to extra values such as an email address
//! - Secret rotation through `old_secrets`
//! - Structured validation results that report tampering and expiry independently
//!
//! ## Usage
//!
//! ```
//! use tokenista_config::TokenistaConfig;
//! use tokenista_token::{ExtraValues, TokenGenerator, TokenValidator};
//!
//! fn main() -> Result<(), tokenista_token::TokenError> {
//!     let config = TokenistaConfig::new("our-secret");
//!     let email = ExtraValues::from([("email".to_string(), "user@example.com".to_string())]);
//!
//!     let token = TokenGenerator::new(config.clone()).generate(Some(3600), &email)?;
//!
//!     let result = TokenValidator::new(config).validate(&token, &email);
//!     assert!(result.is_valid());
//!     Ok(())
//! }
//! ```

mod error;
mod mint;
mod result;
mod sign;
mod token;
mod verify;

pub use error::TokenError;
pub use mint::{random_payload, TokenGenerator, PAYLOAD_BYTES};
pub use result::{Reason, ValidationResult, VALID};
pub use sign::{canonical_json, sign_token, signing_string, ExtraValues};
pub use token::{parse_token, TokenParts, INVALID_SIGNATURE};
pub use verify::TokenValidator;

pub use tokenista_config::{Algorithm, TokenistaConfig};
