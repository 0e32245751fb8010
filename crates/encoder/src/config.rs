//! Encoder configuration
//!
//! Chooses the output format and layout. Configuration can come from code,
//! from a TOML document, or from the `LOGFIELD_FORMAT` environment variable:
//!
//! - Unset → `None`, caller keeps its own default
//! - `json` → compact JSON
//! - `json-pretty` → indented JSON
//! - `text` → logfmt-style text
//!
//! # Example
//!
//! ```
//! use logfield_encoder::{EncoderConfig, Format};
//!
//! let config = EncoderConfig::from_toml_str("format = \"text\"").unwrap();
//! assert_eq!(config.format, Format::Text);
//! ```

use crate::error::EncoderError;
use crate::json::{JsonEncoder, JsonStyle};
use crate::text::TextEncoder;
use crate::Encoder;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Largest accepted pretty-print indent
const MAX_INDENT: usize = 16;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    Text,
}

/// Encoder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    pub format: Format,
    /// Indent nested JSON objects (ignored for text)
    pub pretty: bool,
    /// Spaces per indentation level
    pub indent: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            format: Format::Json,
            pretty: false,
            indent: 2,
        }
    }
}

impl EncoderConfig {
    /// Compact single-line JSON
    pub fn json() -> Self {
        Self::default()
    }

    /// Indented JSON
    pub fn json_pretty() -> Self {
        Self {
            pretty: true,
            ..Self::default()
        }
    }

    pub fn text() -> Self {
        Self {
            format: Format::Text,
            ..Self::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(src: &str) -> Result<Self, EncoderError> {
        let config: EncoderConfig = toml::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from the `LOGFIELD_FORMAT` environment variable
    pub fn from_env() -> Option<Self> {
        let val = std::env::var("LOGFIELD_FORMAT").ok()?;
        match val.trim() {
            "" => None,
            "json" => Some(Self::json()),
            "json-pretty" => Some(Self::json_pretty()),
            "text" => Some(Self::text()),
            other => {
                warn!("LOGFIELD_FORMAT='{}' not recognized, ignoring", other);
                None
            }
        }
    }

    pub fn validate(&self) -> Result<(), EncoderError> {
        if self.indent > MAX_INDENT {
            return Err(EncoderError::Config(format!(
                "indent {} exceeds maximum of {}",
                self.indent, MAX_INDENT
            )));
        }
        Ok(())
    }

    /// Build a fresh encoder for one log line
    pub fn build(&self) -> Box<dyn Encoder> {
        match self.format {
            Format::Json => Box::new(JsonEncoder::new(JsonStyle {
                pretty: self.pretty,
                indent: self.indent.min(MAX_INDENT),
            })),
            Format::Text => Box::new(TextEncoder::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_is_compact_json() {
        let config = EncoderConfig::default();
        assert_eq!(config.format, Format::Json);
        assert!(!config.pretty);
        assert_eq!(config, EncoderConfig::json());
    }

    #[test]
    fn test_from_toml_partial() {
        let config = EncoderConfig::from_toml_str("pretty = true\nindent = 4").unwrap();
        assert_eq!(config.format, Format::Json);
        assert!(config.pretty);
        assert_eq!(config.indent, 4);
    }

    #[test]
    fn test_from_toml_empty_is_default() {
        assert_eq!(
            EncoderConfig::from_toml_str("").unwrap(),
            EncoderConfig::default()
        );
    }

    #[test]
    fn test_from_toml_rejects_unknown_format() {
        let err = EncoderConfig::from_toml_str("format = \"yaml\"").unwrap_err();
        assert!(matches!(err, EncoderError::Toml(_)));
    }

    #[test]
    fn test_from_toml_rejects_unknown_key() {
        assert!(EncoderConfig::from_toml_str("colour = true").is_err());
    }

    #[test]
    fn test_indent_limit() {
        let err = EncoderConfig::from_toml_str("indent = 40").unwrap_err();
        assert!(matches!(err, EncoderError::Config(_)));
        assert!(err.to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = EncoderConfig::text();
        let src = toml::to_string(&config).unwrap();
        assert_eq!(EncoderConfig::from_toml_str(&src).unwrap(), config);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        let cases = [
            ("json", Some(EncoderConfig::json())),
            ("json-pretty", Some(EncoderConfig::json_pretty())),
            ("text", Some(EncoderConfig::text())),
            ("", None),
            ("xml", None),
        ];
        for (val, expected) in cases {
            unsafe { std::env::set_var("LOGFIELD_FORMAT", val) };
            assert_eq!(EncoderConfig::from_env(), expected, "LOGFIELD_FORMAT={}", val);
        }
        unsafe { std::env::remove_var("LOGFIELD_FORMAT") };
        assert_eq!(EncoderConfig::from_env(), None);
    }
}
