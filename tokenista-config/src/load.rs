use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::algorithm::Algorithm;
use crate::config::{TokenistaConfig, DEFAULT_LIFETIME};
use crate::error::ConfigError;

impl TokenistaConfig {
    /// Create a configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(path)?;
        let config: TokenistaConfig = serde_json::from_str(&file_content)?;
        config.log_warnings();
        Ok(config)
    }

    /// Create a configuration from a TOML file
    #[cfg(feature = "toml")]
    pub fn from_toml(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file_content = fs::read_to_string(path)?;
        let config: TokenistaConfig = toml::from_str(&file_content)?;
        config.log_warnings();
        Ok(config)
    }

    /// Create a configuration from environment variables
    ///
    /// The environment variables should be named with the given prefix followed by:
    /// - SECRET: The current signing secret (required, may be empty)
    /// - OLD_SECRETS: Comma separated retired secrets (optional)
    /// - LIFETIME: Default lifetime in seconds (optional, defaults to 3600)
    /// - ALGORITHM: Either "sha1" or "sha256" (optional, defaults to "sha1")
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the secret variable is missing or any variable is invalid.
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let secret = required_var(&format!("{}_SECRET", prefix))?;

        let old_secrets = match optional_var(&format!("{}_OLD_SECRETS", prefix))? {
            Some(list) => split_secret_list(&list),
            None => Vec::new(),
        };

        Self::from_parts(prefix, secret, old_secrets)
    }

    /// Create a configuration from environment variables or files
    ///
    /// This is similar to `from_env`, but secrets may also be read from files. If
    /// `{PREFIX}_SECRET_FILE` is set its contents are used as the secret, with the
    /// trailing line break removed. If `{PREFIX}_OLD_SECRETS_FILE` is set it is read
    /// as one retired secret per line, ignoring blank lines.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if any required variable or file is missing or invalid.
    pub fn from_env_or_file(prefix: &str) -> Result<Self, ConfigError> {
        let secret = match optional_var(&format!("{}_SECRET_FILE", prefix))? {
            Some(secret_file) => fs::read_to_string(secret_file)
                .map_err(|e| ConfigError::Io(format!("Failed to read secret file: {}", e)))?
                .trim_end_matches(['\r', '\n'])
                .to_string(),
            None => required_var(&format!("{}_SECRET", prefix))?,
        };

        let old_secrets = match optional_var(&format!("{}_OLD_SECRETS_FILE", prefix))? {
            Some(secrets_file) => fs::read_to_string(secrets_file)
                .map_err(|e| ConfigError::Io(format!("Failed to read old secrets file: {}", e)))?
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string)
                .collect(),
            None => match optional_var(&format!("{}_OLD_SECRETS", prefix))? {
                Some(list) => split_secret_list(&list),
                None => Vec::new(),
            },
        };

        Self::from_parts(prefix, secret, old_secrets)
    }

    fn from_parts(
        prefix: &str,
        secret: String,
        old_secrets: Vec<String>,
    ) -> Result<Self, ConfigError> {
        let lifetime = match optional_var(&format!("{}_LIFETIME", prefix))? {
            Some(lifetime) => lifetime
                .trim()
                .parse::<i64>()
                .map_err(|_| ConfigError::InvalidLifetime(lifetime.clone()))?,
            None => DEFAULT_LIFETIME,
        };

        let algorithm = match optional_var(&format!("{}_ALGORITHM", prefix))? {
            Some(algorithm) => algorithm.parse::<Algorithm>()?,
            None => Algorithm::default(),
        };

        let config = TokenistaConfig {
            secret,
            old_secrets,
            lifetime,
            algorithm,
        };
        config.log_warnings();
        Ok(config)
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|e| ConfigError::EnvVar(format!("{}: {}", name, e)))
}

fn optional_var(name: &str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar(format!("{}: {}", name, e))),
    }
}

fn split_secret_list(list: &str) -> Vec<String> {
    if list.is_empty() {
        return Vec::new();
    }
    list.split(',').map(str::to_string).collect()
}

fn expand_home(path: &str) -> Option<PathBuf> {
    match path.strip_prefix("~/") {
        Some(stripped) => dirs::home_dir().map(|home| home.join(stripped)),
        None => Some(Path::new(path).to_path_buf()),
    }
}

const DEFAULT_ENV_PREFIX: &str = "TOKENISTA";

const ENV_SUFFIXES: [&str; 6] = [
    "SECRET",
    "SECRET_FILE",
    "OLD_SECRETS",
    "OLD_SECRETS_FILE",
    "LIFETIME",
    "ALGORITHM",
];

/// Whether any variable with the given prefix is set at all
fn env_configured(prefix: &str) -> bool {
    ENV_SUFFIXES
        .iter()
        .any(|suffix| env::var_os(format!("{}_{}", prefix, suffix)).is_some())
}

/// Try to load a configuration from standard locations
///
/// This function attempts to load a configuration from:
/// 1. Environment variables with the prefix "TOKENISTA" (secrets may come from `_FILE` variables)
/// 2. A file at ./tokenista.json
/// 3. A file at ~/.tokenista/config.json
/// 4. A file at /etc/tokenista/config.json
/// 5. If the "toml" feature is enabled, TOML files at the same paths
///
/// The first source that loads wins. A source that is present but broken is logged
/// and skipped. Returns None if no configuration could be found. The result is a
/// plain value; there is no process-wide default configuration.
pub fn try_load_default_config() -> Option<TokenistaConfig> {
    if env_configured(DEFAULT_ENV_PREFIX) {
        match TokenistaConfig::from_env_or_file(DEFAULT_ENV_PREFIX) {
            Ok(config) => return Some(config),
            Err(e) => warn!(
                "ignoring {}_* environment configuration: {}",
                DEFAULT_ENV_PREFIX, e
            ),
        }
    }

    let paths = [
        "./tokenista.json",
        "~/.tokenista/config.json",
        "/etc/tokenista/config.json",
    ];

    for path in paths.iter() {
        let Some(expanded_path) = expand_home(path) else {
            continue;
        };
        if expanded_path.exists() {
            match TokenistaConfig::from_file(&expanded_path) {
                Ok(config) => return Some(config),
                Err(e) => warn!("ignoring {}: {}", expanded_path.display(), e),
            }
        }
    }

    #[cfg(feature = "toml")]
    {
        let toml_paths = [
            "./tokenista.toml",
            "~/.tokenista/config.toml",
            "/etc/tokenista/config.toml",
        ];

        for path in toml_paths.iter() {
            let Some(expanded_path) = expand_home(path) else {
                continue;
            };
            if expanded_path.exists() {
                match TokenistaConfig::from_toml(&expanded_path) {
                    Ok(config) => return Some(config),
                    Err(e) => warn!("ignoring {}: {}", expanded_path.display(), e),
                }
            }
        }
    }

    None
}
