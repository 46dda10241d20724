//! JSON text codec for primitive values
//!
//! The codec only knows the seven shapes. Everything domain-specific
//! (bytes, dates, records) is turned into primitive values by bindings
//! before it reaches this layer.

mod decode;
mod encode;

pub use decode::{decode_json, DecodeError, MAX_DEPTH};
pub use encode::{encode_json, encode_string, EncodeError};

use jsonbind_core::{BindError, Value};

impl From<DecodeError> for BindError {
    fn from(err: DecodeError) -> Self {
        BindError::MalformedInput {
            reason: err.to_string(),
        }
    }
}

impl From<EncodeError> for BindError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::NonFiniteFloat(f) => BindError::invalid("f64", format!("{f} is not finite")),
        }
    }
}

/// Parse JSON text, mapping syntax errors to [`BindError::MalformedInput`]
pub fn parse(text: &str) -> Result<Value, BindError> {
    Ok(decode_json(text)?)
}

/// Render a value as compact JSON text
///
/// Fails with [`BindError::InvalidValue`] on non-finite floats.
pub fn render(value: &Value) -> Result<String, BindError> {
    Ok(encode_json(value)?)
}
