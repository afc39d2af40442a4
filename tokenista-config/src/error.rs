use thiserror::Error;

/// Errors that can occur when loading Tokenista configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("I/O error occurred while reading configuration: {0}. Please check file permissions and paths.")]
    Io(String),

    #[error("Failed to parse configuration data: {0}. Please ensure the configuration format is correct.")]
    Parse(String),

    #[error("Environment variable error: {0}")]
    EnvVar(String),

    #[error("Invalid lifetime '{0}': expected a whole number of seconds")]
    InvalidLifetime(String),

    #[error("Unknown signing algorithm '{0}': expected sha1 or sha256")]
    UnknownAlgorithm(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(error: std::io::Error) -> Self {
        ConfigError::Io(error.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Parse(error.to_string())
    }
}

#[cfg(feature = "toml")]
impl From<toml::de::Error> for ConfigError {
    fn from(error: toml::de::Error) -> Self {
        ConfigError::Parse(error.to_string())
    }
}
