//! Encoder configuration errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EncoderError {
    /// The TOML document could not be parsed into a configuration.
    #[error("invalid encoder config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A configuration value is out of range.
    #[error("invalid encoder config: {0}")]
    Config(String),
}
