//! JSON encoding of primitive values
//!
//! Output is compact. Map entries are written in insertion order. Floats
//! always carry a decimal point or exponent so they decode back as floats.

use jsonbind_core::{Value, ValueMap};
use std::fmt::Write;
use thiserror::Error;

/// Encode error types
#[derive(Debug, Error, PartialEq)]
pub enum EncodeError {
    /// NaN and infinities have no JSON representation
    #[error("non-finite float {0} cannot be encoded")]
    NonFiniteFloat(f64),
}

/// Encode a value to a compact JSON text
pub fn encode_json(value: &Value) -> Result<String, EncodeError> {
    let mut out = String::new();
    write_value(&mut out, value)?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value) -> Result<(), EncodeError> {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Value::Float(f) => write_float(out, *f)?,
        Value::String(s) => write_string(out, s),
        Value::Array(arr) => write_array(out, arr)?,
        Value::Map(map) => write_map(out, map)?,
    }
    Ok(())
}

fn write_float(out: &mut String, f: f64) -> Result<(), EncodeError> {
    if !f.is_finite() {
        return Err(EncodeError::NonFiniteFloat(f));
    }
    let s = f.to_string();
    out.push_str(&s);
    // Whole numbers need a decimal point to stay floats
    if !s.contains(['.', 'e', 'E']) {
        out.push_str(".0");
    }
    Ok(())
}

/// Encode a string with JSON escaping
pub fn encode_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    write_string(&mut out, s);
    out
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\x08' => out.push_str("\\b"),
            '\x0c' => out.push_str("\\f"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_array(out: &mut String, arr: &[Value]) -> Result<(), EncodeError> {
    out.push('[');
    for (i, item) in arr.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(out, item)?;
    }
    out.push(']');
    Ok(())
}

fn write_map(out: &mut String, map: &ValueMap) -> Result<(), EncodeError> {
    out.push('{');
    for (i, (key, value)) in map.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(out, key);
        out.push(':');
        write_value(out, value)?;
    }
    out.push('}');
    Ok(())
}
