//! String quoting shared by the encoders

/// Append `s` to `buf` as a double-quoted JSON string
pub(crate) fn push_quoted(buf: &mut String, s: &str) {
    buf.push_str(&serde_json::Value::from(s).to_string());
}

/// Render a finite float as a JSON number; `None` for NaN and infinities
pub(crate) fn finite_float(value: f64) -> Option<String> {
    serde_json::Number::from_f64(value).map(|n| n.to_string())
}

/// Marker text for values [`finite_float`] rejects
pub(crate) fn non_finite_marker(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value.is_sign_positive() {
        "+Inf"
    } else {
        "-Inf"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quoted(s: &str) -> String {
        let mut buf = String::new();
        push_quoted(&mut buf, s);
        buf
    }

    #[test]
    fn test_plain() {
        assert_eq!(quoted("hello"), "\"hello\"");
    }

    #[test]
    fn test_escapes() {
        assert_eq!(quoted("a\"b\\c\nd"), "\"a\\\"b\\\\c\\nd\"");
        assert_eq!(quoted("\u{1}"), "\"\\u0001\"");
    }

    #[test]
    fn test_quoted_is_valid_json() {
        let s = "tab\there \u{7f} ünï \u{8}\u{c}\r\u{1f}";
        let parsed: String = serde_json::from_str(&quoted(s)).unwrap();
        assert_eq!(parsed, s);
    }

    #[test]
    fn test_floats() {
        assert_eq!(finite_float(1.5).as_deref(), Some("1.5"));
        assert_eq!(finite_float(f64::NAN), None);
        assert_eq!(non_finite_marker(f64::NAN), "NaN");
        assert_eq!(non_finite_marker(f64::INFINITY), "+Inf");
        assert_eq!(non_finite_marker(f64::NEG_INFINITY), "-Inf");
    }
}
