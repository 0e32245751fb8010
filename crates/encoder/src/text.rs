//! logfmt-style text encoder
//!
//! Writes `key=value` pairs separated by single spaces. Nested scopes
//! flatten into dotted keys, so `Field::nest("req", [Field::int("status", 200)])`
//! renders as `req.status=200`.
//!
//! Strings are bare unless they are empty or contain whitespace, `"`, `=`
//! or control characters, in which case they are quoted with JSON escapes.
//! Objects are rendered as compact JSON and always quoted. The same quoting
//! rule applies to the full dotted key.

use crate::Encoder;
use crate::escape::{finite_float, non_finite_marker, push_quoted};
use logfield_core::{KeyValue, LogMarshaler, LogObject};

#[derive(Debug, Default)]
pub struct TextEncoder {
    buf: String,
    scopes: Vec<String>,
}

impl TextEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin_pair(&mut self, key: &str) {
        if !self.buf.is_empty() {
            self.buf.push(' ');
        }
        if self.scopes.is_empty() {
            self.push_text(key);
        } else {
            let mut full = self.scopes.join(".");
            full.push('.');
            full.push_str(key);
            self.push_text(&full);
        }
        self.buf.push('=');
    }

    fn push_text(&mut self, value: &str) {
        if needs_quotes(value) {
            push_quoted(&mut self.buf, value);
        } else {
            self.buf.push_str(value);
        }
    }
}

fn needs_quotes(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || c == '"' || c == '=')
}

impl KeyValue for TextEncoder {
    fn add_bool(&mut self, key: &str, value: bool) {
        self.begin_pair(key);
        self.buf.push_str(if value { "true" } else { "false" });
    }

    fn add_float64(&mut self, key: &str, value: f64) {
        self.begin_pair(key);
        match finite_float(value) {
            Some(n) => self.buf.push_str(&n),
            None => self.buf.push_str(non_finite_marker(value)),
        }
    }

    fn add_int(&mut self, key: &str, value: isize) {
        self.begin_pair(key);
        self.buf.push_str(&value.to_string());
    }

    fn add_int64(&mut self, key: &str, value: i64) {
        self.begin_pair(key);
        self.buf.push_str(&value.to_string());
    }

    fn add_string(&mut self, key: &str, value: &str) {
        self.begin_pair(key);
        self.push_text(value);
    }

    fn add_marshaler(&mut self, key: &str, marshaler: &dyn LogMarshaler) -> logfield_core::Result<()> {
        self.scopes.push(key.to_string());
        let result = marshaler.marshal_log(self);
        self.scopes.pop();
        result
    }

    fn add_object(&mut self, key: &str, object: &dyn LogObject) -> logfield_core::Result<()> {
        let value = object.to_json_value()?;
        self.begin_pair(key);
        push_quoted(&mut self.buf, &value.to_string());
        Ok(())
    }
}

impl Encoder for TextEncoder {
    fn finish(&mut self) -> String {
        self.scopes.clear();
        std::mem::take(&mut self.buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logfield_core::{Field, FieldError, add_fields};
    use std::sync::Arc;

    struct Broken;

    impl LogMarshaler for Broken {
        fn marshal_log(&self, _kv: &mut dyn KeyValue) -> logfield_core::Result<()> {
            Err(FieldError::marshal("no"))
        }
    }

    fn encode(fields: &[Field]) -> String {
        let mut enc = TextEncoder::new();
        add_fields(&mut enc, fields);
        enc.finish()
    }

    #[test]
    fn test_pairs() {
        let out = encode(&[
            Field::string("method", "GET"),
            Field::int("status", 200),
            Field::bool("cached", false),
            Field::float64("ratio", 0.75),
        ]);
        assert_eq!(out, "method=GET status=200 cached=false ratio=0.75");
    }

    #[test]
    fn test_quoting() {
        let out = encode(&[
            Field::string("msg", "hello world"),
            Field::string("empty", ""),
            Field::string("eq", "a=b"),
        ]);
        assert_eq!(out, r#"msg="hello world" empty="" eq="a=b""#);
    }

    #[test]
    fn test_key_quoting() {
        let out = encode(&[
            Field::string("user name", "x=1 y"),
            Field::int("a=b", 1),
            Field::nest("my scope", vec![Field::bool("ok", true)]),
        ]);
        assert_eq!(out, r#""user name"="x=1 y" "a=b"=1 "my scope.ok"=true"#);
    }

    #[test]
    fn test_nested_keys_are_dotted() {
        let out = encode(&[Field::nest(
            "req",
            vec![
                Field::int("status", 200),
                Field::nest("client", vec![Field::string("ip", "10.0.0.1")]),
            ],
        )]);
        assert_eq!(out, "req.status=200 req.client.ip=10.0.0.1");
    }

    #[test]
    fn test_error_field_outside_scope() {
        let out = encode(&[Field::nest(
            "a",
            vec![Field::marshaler("b", Arc::new(Broken))],
        )]);
        assert_eq!(out, "a.bError=no");
    }

    #[test]
    fn test_object_is_quoted_json() {
        let out = encode(&[Field::object("ids", Arc::new(vec![1, 2]))]);
        assert_eq!(out, r#"ids="[1,2]""#);
    }

    #[test]
    fn test_non_finite() {
        let out = encode(&[Field::float64("x", f64::NEG_INFINITY)]);
        assert_eq!(out, "x=-Inf");
    }
}
