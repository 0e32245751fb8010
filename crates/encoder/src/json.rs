//! JSON object encoder
//!
//! Replays fields into a single JSON object. Marshaler fields (including
//! nested groups) become nested objects.
//!
//! # Format Examples
//!
//! - compact: `{"method":"GET","req":{"status":200}}`
//! - pretty:
//!
//! ```text
//! {
//!   "method": "GET",
//!   "req": {
//!     "status": 200
//!   }
//! }
//! ```
//!
//! Non-finite floats have no JSON representation and are written as the
//! strings `"NaN"`, `"+Inf"` and `"-Inf"`.

use crate::Encoder;
use crate::escape::{finite_float, non_finite_marker, push_quoted};
use logfield_core::{FieldError, KeyValue, LogMarshaler, LogObject};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Formatting options for [`JsonEncoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonStyle {
    pub pretty: bool,
    /// Spaces per nesting level when pretty
    pub indent: usize,
}

impl Default for JsonStyle {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 2,
        }
    }
}

/// Writes fields as one JSON object
#[derive(Debug)]
pub struct JsonEncoder {
    style: JsonStyle,
    buf: String,
    // One entry per open object: true until its first member is written.
    open: Vec<bool>,
}

impl Default for JsonEncoder {
    fn default() -> Self {
        Self::new(JsonStyle::default())
    }
}

impl JsonEncoder {
    pub fn new(style: JsonStyle) -> Self {
        JsonEncoder {
            style,
            buf: String::from("{"),
            open: vec![true],
        }
    }

    pub fn compact() -> Self {
        Self::default()
    }

    pub fn pretty() -> Self {
        Self::new(JsonStyle {
            pretty: true,
            ..JsonStyle::default()
        })
    }

    fn newline_indent(&mut self, depth: usize) {
        self.buf.push('\n');
        for _ in 0..(depth * self.style.indent) {
            self.buf.push(' ');
        }
    }

    fn begin_member(&mut self, key: &str) {
        let depth = self.open.len();
        if let Some(first) = self.open.last_mut() {
            if !*first {
                self.buf.push(',');
            }
            *first = false;
        }
        if self.style.pretty {
            self.newline_indent(depth);
        }
        push_quoted(&mut self.buf, key);
        self.buf.push(':');
        if self.style.pretty {
            self.buf.push(' ');
        }
    }

    fn open_object(&mut self) {
        self.buf.push('{');
        self.open.push(true);
    }

    fn close_object(&mut self) {
        if let Some(empty) = self.open.pop() {
            if self.style.pretty && !empty {
                let depth = self.open.len();
                self.newline_indent(depth);
            }
            self.buf.push('}');
        }
    }

    fn render_value(&self, value: &serde_json::Value) -> logfield_core::Result<String> {
        if !self.style.pretty {
            return Ok(value.to_string());
        }
        let indent = " ".repeat(self.style.indent);
        let mut out = Vec::new();
        let mut ser =
            Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(indent.as_bytes()));
        value.serialize(&mut ser)?;
        let rendered = String::from_utf8(out).map_err(FieldError::custom)?;

        // Shift continuation lines to the current nesting depth.
        let pad = " ".repeat(self.open.len() * self.style.indent);
        Ok(rendered.replace('\n', &format!("\n{}", pad)))
    }
}

impl KeyValue for JsonEncoder {
    fn add_bool(&mut self, key: &str, value: bool) {
        self.begin_member(key);
        self.buf.push_str(if value { "true" } else { "false" });
    }

    fn add_float64(&mut self, key: &str, value: f64) {
        self.begin_member(key);
        match finite_float(value) {
            Some(n) => self.buf.push_str(&n),
            None => push_quoted(&mut self.buf, non_finite_marker(value)),
        }
    }

    fn add_int(&mut self, key: &str, value: isize) {
        self.begin_member(key);
        self.buf.push_str(&value.to_string());
    }

    fn add_int64(&mut self, key: &str, value: i64) {
        self.begin_member(key);
        self.buf.push_str(&value.to_string());
    }

    fn add_string(&mut self, key: &str, value: &str) {
        self.begin_member(key);
        push_quoted(&mut self.buf, value);
    }

    fn add_marshaler(&mut self, key: &str, marshaler: &dyn LogMarshaler) -> logfield_core::Result<()> {
        self.begin_member(key);
        self.open_object();
        let result = marshaler.marshal_log(self);
        self.close_object();
        result
    }

    fn add_object(&mut self, key: &str, object: &dyn LogObject) -> logfield_core::Result<()> {
        // Encode before writing the key so a failure leaves no dangling member.
        let value = object.to_json_value()?;
        let rendered = self.render_value(&value)?;
        self.begin_member(key);
        self.buf.push_str(&rendered);
        Ok(())
    }
}

impl Encoder for JsonEncoder {
    fn finish(&mut self) -> String {
        while !self.open.is_empty() {
            self.close_object();
        }
        let out = std::mem::replace(&mut self.buf, String::from("{"));
        self.open.push(true);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logfield_core::{Field, add_fields};
    use std::collections::HashMap;
    use std::sync::Arc;

    struct Broken;

    impl LogMarshaler for Broken {
        fn marshal_log(&self, kv: &mut dyn KeyValue) -> logfield_core::Result<()> {
            kv.add_int64("partial", 1);
            Err(FieldError::marshal("gave up"))
        }
    }

    fn encode(enc: &mut JsonEncoder, fields: &[Field]) -> String {
        add_fields(enc, fields);
        enc.finish()
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(JsonEncoder::compact().finish(), "{}");
        assert_eq!(JsonEncoder::pretty().finish(), "{}");
    }

    #[test]
    fn test_scalars() {
        let out = encode(
            &mut JsonEncoder::compact(),
            &[
                Field::bool("ok", true),
                Field::int("n", -4),
                Field::int64("big", i64::MIN),
                Field::float64("f", 0.5),
                Field::string("s", "a\"b"),
                Field::skip(),
            ],
        );
        assert_eq!(
            out,
            r#"{"ok":true,"n":-4,"big":-9223372036854775808,"f":0.5,"s":"a\"b"}"#
        );
    }

    #[test]
    fn test_non_finite_floats() {
        let out = encode(
            &mut JsonEncoder::compact(),
            &[
                Field::float64("a", f64::NAN),
                Field::float64("b", f64::INFINITY),
                Field::float64("c", f64::NEG_INFINITY),
            ],
        );
        assert_eq!(out, r#"{"a":"NaN","b":"+Inf","c":"-Inf"}"#);
    }

    #[test]
    fn test_nested_group() {
        let out = encode(
            &mut JsonEncoder::compact(),
            &[Field::nest(
                "req",
                vec![Field::int("status", 200), Field::string("method", "GET")],
            )],
        );
        assert_eq!(out, r#"{"req":{"status":200,"method":"GET"}}"#);
    }

    #[test]
    fn test_marshaler_failure_stays_well_formed() {
        let out = encode(
            &mut JsonEncoder::compact(),
            &[Field::marshaler("m", Arc::new(Broken)), Field::bool("after", true)],
        );
        assert_eq!(
            out,
            r#"{"m":{"partial":1},"mError":"gave up","after":true}"#
        );
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["mError"], "gave up");
    }

    #[test]
    fn test_object_field() {
        let mut map = HashMap::new();
        map.insert("k", vec![1, 2]);
        let out = encode(&mut JsonEncoder::compact(), &[Field::object("o", Arc::new(map))]);
        assert_eq!(out, r#"{"o":{"k":[1,2]}}"#);
    }

    #[test]
    fn test_object_failure() {
        let mut map = HashMap::new();
        map.insert((1, 2), 3);
        let out = encode(
            &mut JsonEncoder::compact(),
            &[Field::object("payload", Arc::new(map))],
        );
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(parsed.get("payload").is_none());
        assert_eq!(parsed["payloadError"], "key must be a string");
    }

    #[test]
    fn test_pretty() {
        let out = encode(
            &mut JsonEncoder::pretty(),
            &[
                Field::string("method", "GET"),
                Field::nest("req", vec![Field::int("status", 200)]),
                Field::nest("empty", Vec::<Field>::new()),
            ],
        );
        assert_eq!(
            out,
            "{\n  \"method\": \"GET\",\n  \"req\": {\n    \"status\": 200\n  },\n  \"empty\": {}\n}"
        );
    }

    #[test]
    fn test_pretty_object_is_indented() {
        let out = encode(
            &mut JsonEncoder::pretty(),
            &[Field::nest(
                "outer",
                vec![Field::object("list", Arc::new(vec![1, 2]))],
            )],
        );
        assert_eq!(
            out,
            "{\n  \"outer\": {\n    \"list\": [\n      1,\n      2\n    ]\n  }\n}"
        );
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["outer"]["list"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_finish_resets() {
        let mut enc = JsonEncoder::compact();
        assert_eq!(encode(&mut enc, &[Field::bool("a", true)]), r#"{"a":true}"#);
        assert_eq!(encode(&mut enc, &[Field::bool("b", false)]), r#"{"b":false}"#);
    }
}
