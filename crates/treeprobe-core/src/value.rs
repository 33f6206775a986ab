//! Plain data values for props, event fields and diagnostic dumps.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::Colors;

/// Largest integer an `f64` represents exactly (2^53).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Self-contained data value.
///
/// `Object` uses `Vec<(String, Value)>` to preserve insertion order, which
/// keeps dumps stable across runs.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    /// Object with ordered fields.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Truthiness as a scripting host would judge it: `null`, `false`, `0`,
    /// `NaN` and `""` are falsy, everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up a field of an `Object`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(fields) => fields.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Render as text the way string concatenation would: strings verbatim,
    /// numbers without a trailing `.0`, everything else as compact JSON.
    pub fn to_text(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Bool(b) => b.to_string(),
            other => other.format(false, Colors::OFF),
        }
    }

    /// Format value as JSON, optionally pretty-printed with two-space indent.
    ///
    /// Color scheme (jq-inspired):
    /// - Keys: key color
    /// - Strings, numbers, booleans: literal color
    /// - null and structure `{}[]:,`: dim
    pub fn format(&self, pretty: bool, colors: Colors) -> String {
        let mut out = String::new();
        format_value(&mut out, self, &colors, pretty, 0);
        out
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false, Colors::OFF))
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => match as_integer(*n) {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for item in arr {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

/// Format a number without a trailing `.0` for integral values.
///
/// Non-finite values use the spelling a scripting host prints
/// (`NaN`, `Infinity`).
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned();
    }
    match as_integer(n) {
        Some(i) => i.to_string(),
        None => n.to_string(),
    }
}

fn as_integer(n: f64) -> Option<i64> {
    if n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Some(n as i64)
    } else {
        None
    }
}

fn format_value(out: &mut String, value: &Value, c: &Colors, pretty: bool, indent: usize) {
    match value {
        Value::Null => {
            out.push_str(c.dim);
            out.push_str("null");
            out.push_str(c.reset);
        }
        Value::Bool(b) => {
            out.push_str(c.literal);
            out.push_str(if *b { "true" } else { "false" });
            out.push_str(c.reset);
        }
        Value::Number(n) => {
            out.push_str(c.literal);
            // JSON has no spelling for non-finite numbers.
            if n.is_finite() {
                out.push_str(&format_number(*n));
            } else {
                out.push_str("null");
            }
            out.push_str(c.reset);
        }
        Value::String(s) => {
            out.push_str(c.literal);
            out.push('"');
            out.push_str(&escape_json_string(s));
            out.push('"');
            out.push_str(c.reset);
        }
        Value::Array(arr) => format_array(out, arr, c, pretty, indent),
        Value::Object(fields) => format_object(out, fields, c, pretty, indent),
    }
}

fn format_array(out: &mut String, arr: &[Value], c: &Colors, pretty: bool, indent: usize) {
    push_dim(out, c, "[");

    if arr.is_empty() {
        push_dim(out, c, "]");
        return;
    }

    let elem_indent = if pretty { indent + 2 } else { 0 };

    for (i, item) in arr.iter().enumerate() {
        if i > 0 {
            push_dim(out, c, ",");
        }
        push_break(out, pretty, elem_indent);
        format_value(out, item, c, pretty, elem_indent);
    }

    push_break(out, pretty, indent);
    push_dim(out, c, "]");
}

fn format_object(
    out: &mut String,
    fields: &[(String, Value)],
    c: &Colors,
    pretty: bool,
    indent: usize,
) {
    push_dim(out, c, "{");

    if fields.is_empty() {
        push_dim(out, c, "}");
        return;
    }

    let field_indent = if pretty { indent + 2 } else { 0 };

    for (i, (key, value)) in fields.iter().enumerate() {
        if i > 0 {
            push_dim(out, c, ",");
        }
        push_break(out, pretty, field_indent);

        out.push_str(c.key);
        out.push('"');
        out.push_str(&escape_json_string(key));
        out.push('"');
        out.push_str(c.reset);

        push_dim(out, c, ":");
        if pretty {
            out.push(' ');
        }

        format_value(out, value, c, pretty, field_indent);
    }

    push_break(out, pretty, indent);
    push_dim(out, c, "}");
}

fn push_dim(out: &mut String, c: &Colors, s: &str) {
    out.push_str(c.dim);
    out.push_str(s);
    out.push_str(c.reset);
}

fn push_break(out: &mut String, pretty: bool, indent: usize) {
    if pretty {
        out.push('\n');
        out.push_str(&" ".repeat(indent));
    }
}

fn escape_json_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '"' => result.push_str("\\\""),
            '\\' => result.push_str("\\\\"),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result
}
