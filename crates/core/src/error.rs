//! Field Encoding Errors
//!
//! Errors a sink reports while encoding marshaler and object fields.
//! Replay never returns these to its caller: they are folded into a
//! sibling `<key>Error` string field instead (see [`crate::Field::add_to`]).

use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, FieldError>;

/// Failure while encoding a single field.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A user marshaler rejected its own value.
    #[error("{0}")]
    Marshal(String),

    /// serde could not represent an object field.
    #[error("{0}")]
    Object(#[from] serde_json::Error),

    /// Any other error raised by a marshaler.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl FieldError {
    /// Build a marshal error from a message
    pub fn marshal(msg: impl Into<String>) -> Self {
        FieldError::Marshal(msg.into())
    }

    /// Wrap an arbitrary error raised while marshaling
    pub fn custom<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        FieldError::Custom(Box::new(err))
    }
}
