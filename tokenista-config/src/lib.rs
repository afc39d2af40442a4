//! # Tokenista Config
//!
//! Configuration for issuing and validating Tokenista tokens.
//!
//! A [`TokenistaConfig`] holds the current signing secret, any retired secrets that
//! should still be accepted during rotation, the default token lifetime and the
//! signing algorithm. It is built once and then handed by value to the generator
//! and validator; nothing in the crate keeps global or shared mutable state.
//!
//! ## Usage
//!
//! ```
//! use tokenista_config::{Algorithm, TokenistaConfig};
//!
//! let config = TokenistaConfig::builder()
//!     .secret("our-secret")
//!     .old_secret("last-months-secret")
//!     .lifetime(900)
//!     .algorithm(Algorithm::Sha1)
//!     .build();
//!
//! assert_eq!(config.lifetime, 900);
//! assert_eq!(config.old_secrets, vec!["last-months-secret".to_string()]);
//! ```
//!
//! Configurations can also be loaded from JSON or TOML files and from environment
//! variables, see [`TokenistaConfig::from_file`], [`TokenistaConfig::from_env`] and
//! [`try_load_default_config`].

mod algorithm;
mod config;
mod error;
mod load;

pub use algorithm::Algorithm;
pub use config::{ConfigWarning, TokenistaConfig, TokenistaConfigBuilder, DEFAULT_LIFETIME};
pub use error::ConfigError;
pub use load::try_load_default_config;
