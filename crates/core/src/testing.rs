//! Recording sink for tests
//!
//! `RecordingSink` implements [`KeyValue`] by appending every call it
//! receives to a list, so tests can assert on the exact sequence replay
//! produced. Marshalers are bracketed by `OpenScope`/`CloseScope`.

use crate::error::Result;
use crate::keyvalue::{KeyValue, LogMarshaler, LogObject};

/// One call received by a [`RecordingSink`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Bool(String, bool),
    Float64(String, f64),
    Int(String, isize),
    Int64(String, i64),
    String(String, String),
    /// A successfully encoded object, as serde saw it
    Object(String, serde_json::Value),
    OpenScope(String),
    CloseScope,
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Vec<Call>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub fn into_calls(self) -> Vec<Call> {
        self.calls
    }
}

impl KeyValue for RecordingSink {
    fn add_bool(&mut self, key: &str, value: bool) {
        self.calls.push(Call::Bool(key.to_string(), value));
    }

    fn add_float64(&mut self, key: &str, value: f64) {
        self.calls.push(Call::Float64(key.to_string(), value));
    }

    fn add_int(&mut self, key: &str, value: isize) {
        self.calls.push(Call::Int(key.to_string(), value));
    }

    fn add_int64(&mut self, key: &str, value: i64) {
        self.calls.push(Call::Int64(key.to_string(), value));
    }

    fn add_string(&mut self, key: &str, value: &str) {
        self.calls
            .push(Call::String(key.to_string(), value.to_string()));
    }

    fn add_marshaler(&mut self, key: &str, marshaler: &dyn LogMarshaler) -> Result<()> {
        self.calls.push(Call::OpenScope(key.to_string()));
        let result = marshaler.marshal_log(self);
        self.calls.push(Call::CloseScope);
        result
    }

    fn add_object(&mut self, key: &str, object: &dyn LogObject) -> Result<()> {
        let value = object.to_json_value()?;
        self.calls.push(Call::Object(key.to_string(), value));
        Ok(())
    }
}
