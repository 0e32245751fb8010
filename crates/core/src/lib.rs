//! logfield core: deferred, typed key-value fields for structured logging
//!
//! A [`Field`] describes a value once, at the call site, and is replayed
//! later into any sink implementing [`KeyValue`] (a JSON writer, a text
//! writer, a test recorder). Replay is a single exhaustive `match` on the
//! field's kind; no encoding happens until then.
//!
//! # Modules
//!
//! - `field`: the `Field` value, its factories, and replay
//! - `keyvalue`: the sink contract and the marshaler/object capabilities
//! - `nest`: ordered field groups replayed under a sub-scope
//! - `pool`: reusable string buffers for stacktrace capture
//! - `stacktrace`: current-thread backtrace formatting
//! - `time`: timestamp to epoch-seconds conversion
//! - `error`: encoding failures reported by sinks
//! - `testing`: a sink that records calls, for tests
//!
//! # Example
//!
//! ```
//! use logfield_core::testing::{Call, RecordingSink};
//! use logfield_core::{Field, add_fields};
//!
//! let fields = vec![
//!     Field::string("method", "GET"),
//!     Field::nest("resp", vec![Field::int("status", 200)]),
//! ];
//! let mut sink = RecordingSink::new();
//! add_fields(&mut sink, &fields);
//! assert_eq!(sink.calls()[0], Call::String("method".into(), "GET".into()));
//! ```

pub mod error;
pub mod field;
pub mod keyvalue;
pub mod nest;
pub mod pool;
pub mod stacktrace;
pub mod testing;
pub mod time;

pub use error::{FieldError, Result};
pub use field::{
    ERROR_KEY, ERROR_SUFFIX, Field, FieldType, FieldValue, STACKTRACE_KEY, add_fields,
};
pub use keyvalue::{KeyValue, LogMarshaler, LogObject};
pub use nest::Fields;
pub use pool::{BufferPool, PoolConfig, PooledBuffer};
pub use time::time_to_seconds;
