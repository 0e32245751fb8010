//! Field: a deferred key-value pair
//!
//! A `Field` describes one typed value at the call site without encoding
//! it. The logger hands a slice of fields, unopened, to an encoder, which
//! replays each one into itself with [`Field::add_to`].
//!
//! # Representation
//!
//! Every kind shares one small value type. Scalars carry their payload
//! inline (floats as their IEEE 754 bit pattern), strings own a `String`,
//! and the three reference kinds hold an `Arc` to the caller's object so
//! cloning a field never copies user data.
//!
//! ```text
//! Field { key, value: FieldValue }
//!   Skip                         no payload, key ignored
//!   Bool(bool)
//!   Float64 { bits: u64 }        f64::to_bits / f64::from_bits
//!   Int(i64)                     isize widened
//!   Int64(i64)
//!   String(String)
//!   Stringer(Arc<dyn Display>)   formatted at replay time
//!   Marshaler(Arc<dyn LogMarshaler>)
//!   Object(Arc<dyn LogObject>)
//! ```
//!
//! # Thread Safety
//!
//! Fields are immutable and `Send + Sync`. Building on one thread and
//! replaying on another is fine. Replaying a stringer or object field while
//! another thread mutates the referenced value is the caller's race.

use crate::keyvalue::{KeyValue, LogMarshaler, LogObject};
use crate::nest::Fields;
use crate::pool::BufferPool;
use crate::stacktrace;
use crate::time::time_to_seconds;
use base64::prelude::*;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Key used by [`Field::error`]
pub const ERROR_KEY: &str = "error";

/// Key used by [`Field::stack`]
pub const STACKTRACE_KEY: &str = "stacktrace";

/// Suffix appended to a field's key when its encoder fails
pub const ERROR_SUFFIX: &str = "Error";

/// Payload-free discriminant of a [`FieldValue`]
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Skip = 0,
    Bool = 1,
    Float64 = 2,
    Int = 3,
    Int64 = 4,
    String = 5,
    Stringer = 6,
    Marshaler = 7,
    Object = 8,
}

impl FieldType {
    /// Decode a raw tag; `None` for anything outside the closed set
    pub fn from_u8(tag: u8) -> Option<FieldType> {
        match tag {
            0 => Some(FieldType::Skip),
            1 => Some(FieldType::Bool),
            2 => Some(FieldType::Float64),
            3 => Some(FieldType::Int),
            4 => Some(FieldType::Int64),
            5 => Some(FieldType::String),
            6 => Some(FieldType::Stringer),
            7 => Some(FieldType::Marshaler),
            8 => Some(FieldType::Object),
            _ => None,
        }
    }
}

/// The payload of a field, one variant per kind
#[derive(Clone)]
pub enum FieldValue {
    Skip,
    Bool(bool),
    /// Raw bit pattern; reinterpret with `f64::from_bits`, never cast
    Float64 {
        bits: u64,
    },
    Int(i64),
    Int64(i64),
    String(String),
    Stringer(Arc<dyn fmt::Display + Send + Sync>),
    Marshaler(Arc<dyn LogMarshaler>),
    Object(Arc<dyn LogObject>),
}

impl FieldValue {
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Skip => FieldType::Skip,
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::Float64 { .. } => FieldType::Float64,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::Int64(_) => FieldType::Int64,
            FieldValue::String(_) => FieldType::String,
            FieldValue::Stringer(_) => FieldType::Stringer,
            FieldValue::Marshaler(_) => FieldType::Marshaler,
            FieldValue::Object(_) => FieldType::Object,
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Skip => write!(f, "Skip"),
            FieldValue::Bool(b) => write!(f, "Bool({})", b),
            FieldValue::Float64 { bits } => write!(f, "Float64({:?})", f64::from_bits(*bits)),
            FieldValue::Int(n) => write!(f, "Int({})", n),
            FieldValue::Int64(n) => write!(f, "Int64({})", n),
            FieldValue::String(s) => write!(f, "String({:?})", s),
            FieldValue::Stringer(_) => write!(f, "Stringer(..)"),
            FieldValue::Marshaler(_) => write!(f, "Marshaler(..)"),
            FieldValue::Object(_) => write!(f, "Object(..)"),
        }
    }
}

/// A deferred marshaling operation adding one key-value pair to a log line
#[derive(Clone, Debug)]
pub struct Field {
    key: Cow<'static, str>,
    value: FieldValue,
}

impl Field {
    fn new(key: impl Into<Cow<'static, str>>, value: FieldValue) -> Self {
        Field {
            key: key.into(),
            value,
        }
    }

    /// A no-op field; replay writes nothing
    pub fn skip() -> Self {
        Field::new("", FieldValue::Skip)
    }

    pub fn bool(key: impl Into<Cow<'static, str>>, val: bool) -> Self {
        Field::new(key, FieldValue::Bool(val))
    }

    /// How the float is rendered is up to the sink.
    pub fn float64(key: impl Into<Cow<'static, str>>, val: f64) -> Self {
        Field::new(key, FieldValue::Float64 { bits: val.to_bits() })
    }

    pub fn int(key: impl Into<Cow<'static, str>>, val: isize) -> Self {
        Field::new(key, FieldValue::Int(val as i64))
    }

    pub fn int64(key: impl Into<Cow<'static, str>>, val: i64) -> Self {
        Field::new(key, FieldValue::Int64(val))
    }

    pub fn string(key: impl Into<Cow<'static, str>>, val: impl Into<String>) -> Self {
        Field::new(key, FieldValue::String(val.into()))
    }

    /// Padded, standard-alphabet base64 of `val`, encoded now
    ///
    /// The result is an ordinary string field.
    pub fn base64(key: impl Into<Cow<'static, str>>, val: &[u8]) -> Self {
        Field::string(key, BASE64_STANDARD.encode(val))
    }

    /// A value formatted with `Display` when the field is replayed
    ///
    /// The output reflects the value's state at replay, not at construction.
    pub fn stringer<T>(key: impl Into<Cow<'static, str>>, val: Arc<T>) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Field::new(key, FieldValue::Stringer(val))
    }

    /// Integer nanoseconds, saturating at `i64::MAX`
    pub fn duration(key: impl Into<Cow<'static, str>>, val: Duration) -> Self {
        let nanos = i64::try_from(val.as_nanos()).unwrap_or(i64::MAX);
        Field::int64(key, nanos)
    }

    /// Floating-point seconds since the Unix epoch
    pub fn time(key: impl Into<Cow<'static, str>>, val: SystemTime) -> Self {
        Field::float64(key, time_to_seconds(val))
    }

    /// The error's message under the key `"error"`, or a no-op for `None`
    ///
    /// Apart from saving a few keystrokes this is no different from a
    /// `None` check and [`Field::string`].
    pub fn error(err: Option<&dyn std::error::Error>) -> Self {
        match err {
            Some(err) => Field::string(ERROR_KEY, err.to_string()),
            None => Field::skip(),
        }
    }

    /// A user type that writes its own fields into a sub-scope
    pub fn marshaler<T>(key: impl Into<Cow<'static, str>>, val: Arc<T>) -> Self
    where
        T: LogMarshaler + 'static,
    {
        Field::new(key, FieldValue::Marshaler(val))
    }

    /// An arbitrary serializable value, encoded reflectively by the sink
    ///
    /// Relatively slow and allocation-heavy. If the sink cannot encode it,
    /// the failure shows up in the output as `<key>Error`.
    pub fn object<T>(key: impl Into<Cow<'static, str>>, val: Arc<T>) -> Self
    where
        T: LogObject + 'static,
    {
        Field::new(key, FieldValue::Object(val))
    }

    /// Group `fields` under a nested namespace named `key`
    pub fn nest(key: impl Into<Cow<'static, str>>, fields: impl Into<Fields>) -> Self {
        Field::new(key, FieldValue::Marshaler(Arc::new(fields.into())))
    }

    /// The calling thread's stacktrace under the key `"stacktrace"`
    ///
    /// Taking a stacktrace is expensive: it allocates and costs on the
    /// order of microseconds. Uses the process-wide [`BufferPool`].
    pub fn stack() -> Self {
        Field::stack_with(BufferPool::global())
    }

    /// Like [`Field::stack`], formatting through the given pool
    pub fn stack_with(pool: &BufferPool) -> Self {
        let mut buf = pool.get();
        stacktrace::take(&mut buf, false);
        // Copying out costs an allocation but keeps the scratch buffer pooled.
        Field::string(STACKTRACE_KEY, buf.as_str())
    }

    /// The key; empty for skip fields
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn field_type(&self) -> FieldType {
        self.value.field_type()
    }

    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// Replay this field into a sink
    ///
    /// Makes exactly one sink call for the field's kind (none for skip).
    /// If a marshaler or object fails to encode, the failure is not
    /// returned: it is written as an extra string field `<key>Error` so the
    /// rest of the log line survives.
    pub fn add_to(&self, kv: &mut dyn KeyValue) {
        let key = self.key.as_ref();
        let result = match &self.value {
            FieldValue::Skip => Ok(()),
            FieldValue::Bool(b) => {
                kv.add_bool(key, *b);
                Ok(())
            }
            FieldValue::Float64 { bits } => {
                kv.add_float64(key, f64::from_bits(*bits));
                Ok(())
            }
            FieldValue::Int(n) => {
                kv.add_int(key, *n as isize);
                Ok(())
            }
            FieldValue::Int64(n) => {
                kv.add_int64(key, *n);
                Ok(())
            }
            FieldValue::String(s) => {
                kv.add_string(key, s);
                Ok(())
            }
            FieldValue::Stringer(v) => {
                kv.add_string(key, &v.to_string());
                Ok(())
            }
            FieldValue::Marshaler(m) => kv.add_marshaler(key, m.as_ref()),
            FieldValue::Object(o) => kv.add_object(key, o.as_ref()),
        };

        if let Err(err) = result {
            debug!(key, error = %err, "field encoding failed, recording as {}{}", key, ERROR_SUFFIX);
            kv.add_string(&format!("{}{}", key, ERROR_SUFFIX), &err.to_string());
        }
    }
}

/// Replay `fields` into `kv` in order
pub fn add_fields(kv: &mut dyn KeyValue, fields: &[Field]) {
    for field in fields {
        field.add_to(kv);
    }
}
