//! logfield encoder: reference sinks for logfield fields
//!
//! Concrete [`KeyValue`] implementations that turn a replayed field list
//! into one rendered log payload.
//!
//! # Modules
//!
//! - `json`: a JSON object encoder, compact or pretty
//! - `text`: a logfmt-style `key=value` encoder
//! - `config`: format selection from code, TOML, or the environment
//!
//! # Example
//!
//! ```
//! use logfield_core::Field;
//! use logfield_encoder::{EncoderConfig, encode_fields};
//!
//! let fields = [
//!     Field::string("method", "GET"),
//!     Field::nest("req", vec![Field::int("status", 200)]),
//! ];
//! assert_eq!(
//!     encode_fields(&EncoderConfig::json(), &fields),
//!     r#"{"method":"GET","req":{"status":200}}"#
//! );
//! assert_eq!(
//!     encode_fields(&EncoderConfig::text(), &fields),
//!     "method=GET req.status=200"
//! );
//! ```

pub mod config;
pub mod error;
mod escape;
pub mod json;
pub mod text;

use logfield_core::{Field, KeyValue, add_fields};

pub use config::{EncoderConfig, Format};
pub use error::EncoderError;
pub use json::{JsonEncoder, JsonStyle};
pub use text::TextEncoder;

/// A sink that produces one rendered payload
pub trait Encoder: KeyValue + Send {
    /// Take the rendered output, leaving the encoder ready for reuse
    fn finish(&mut self) -> String;
}

/// Replay `fields` through a fresh encoder built from `config`
pub fn encode_fields(config: &EncoderConfig, fields: &[Field]) -> String {
    let mut encoder = config.build();
    add_fields(&mut *encoder, fields);
    encoder.finish()
}
