//! Sink Contract
//!
//! The write target that replay translates fields into. Every encoder
//! (JSON writer, text writer, recording test sink) implements [`KeyValue`];
//! replay performs exactly one call on it per field.
//!
//! # Capabilities
//!
//! Reference-like field payloads are chosen by trait at construction time:
//!
//! - string producer: [`std::fmt::Display`]
//! - self-encoder: [`LogMarshaler`]
//! - reflectively encodable: [`LogObject`] (anything `serde::Serialize`)

use crate::error::Result;
use serde::Serialize;

/// Write target for replayed fields
///
/// Scalar writes are unconditional. `add_marshaler` and `add_object` may
/// fail; replay absorbs those failures, so implementations should report
/// errors rather than panic.
pub trait KeyValue {
    fn add_bool(&mut self, key: &str, value: bool);
    fn add_float64(&mut self, key: &str, value: f64);
    fn add_int(&mut self, key: &str, value: isize);
    fn add_int64(&mut self, key: &str, value: i64);
    fn add_string(&mut self, key: &str, value: &str);

    /// Open a sub-scope named `key` and let the marshaler write into it.
    ///
    /// Implementations must close the scope even when the marshaler fails.
    fn add_marshaler(&mut self, key: &str, marshaler: &dyn LogMarshaler) -> Result<()>;

    /// Encode an arbitrary object under `key` through serde.
    fn add_object(&mut self, key: &str, object: &dyn LogObject) -> Result<()>;
}

/// A value that knows how to write its own fields into a sink
///
/// This is the flexible, type-safe way to put user types into a log line.
/// The call happens lazily, at replay time.
pub trait LogMarshaler: Send + Sync {
    fn marshal_log(&self, kv: &mut dyn KeyValue) -> Result<()>;
}

/// A value encoded reflectively by the sink
///
/// Blanket-implemented for every `Serialize` type. Slower and more
/// allocation-heavy than [`LogMarshaler`], and it may fail (for example a
/// map whose keys are not strings).
pub trait LogObject: Send + Sync {
    fn to_json_value(&self) -> Result<serde_json::Value>;
}

impl<T> LogObject for T
where
    T: Serialize + Send + Sync + ?Sized,
{
    fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}
