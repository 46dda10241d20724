//! Wire encoding for jsonbind
//!
//! This crate converts between JSON text and the primitive [`Value`] tree.
//!
//! ## Wire Encoding Rules
//!
//! | Value Type | JSON Encoding |
//! |------------|--------------|
//! | Null | `null` |
//! | Bool | `true`/`false` |
//! | Int | integral number |
//! | Float | number with a decimal point or exponent |
//! | String | `"..."` |
//! | Array | `[...]` |
//! | Map | `{...}` in insertion order |
//!
//! Non-finite floats cannot be encoded.
//!
//! ## Examples
//!
//! ```
//! use jsonbind_wire::{encode_json, decode_json};
//! use jsonbind_core::Value;
//!
//! let json = encode_json(&Value::Int(42)).unwrap();
//! assert_eq!(json, "42");
//!
//! let decoded = decode_json("1.0").unwrap();
//! assert_eq!(decoded, Value::Float(1.0));
//! ```
//!
//! [`Value`]: jsonbind_core::Value

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod json;

pub use json::{
    decode_json, encode_json, encode_string, parse, render, DecodeError, EncodeError, MAX_DEPTH,
};
