//! JSON decoding into primitive values
//!
//! Numbers without a fraction or exponent that fit in an `i64` decode to
//! `Value::Int`; every other number decodes to `Value::Float`. Object keys
//! keep their textual order, and a repeated key keeps its first position
//! with the last value.

use jsonbind_core::{Value, ValueMap};
use thiserror::Error;

/// Containers nested deeper than this are rejected
pub const MAX_DEPTH: usize = 128;

/// Decode error types
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    /// Invalid JSON syntax
    #[error("invalid JSON at byte {pos}: {reason}")]
    InvalidJson {
        /// Byte offset where parsing failed
        pos: usize,
        /// What was expected
        reason: String,
    },

    /// Invalid number format
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// Unexpected end of input
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// Unexpected character
    #[error("unexpected character {ch:?} at byte {pos}")]
    UnexpectedChar {
        /// The offending character
        ch: char,
        /// Byte offset
        pos: usize,
    },

    /// Content after the top-level value
    #[error("trailing characters at byte {0}")]
    TrailingCharacters(usize),

    /// Containers nested deeper than [`MAX_DEPTH`]
    #[error("nesting deeper than {MAX_DEPTH}")]
    TooDeep,
}

/// Decode a JSON text to a primitive value
pub fn decode_json(json: &str) -> Result<Value, DecodeError> {
    let mut parser = JsonParser::new(json);
    parser.skip_whitespace();
    if parser.peek().is_none() {
        return Err(DecodeError::UnexpectedEnd);
    }
    let value = parser.parse_value(0)?;
    parser.skip_whitespace();
    if parser.pos < parser.input.len() {
        return Err(DecodeError::TrailingCharacters(parser.pos));
    }
    Ok(value)
}

struct JsonParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> JsonParser<'a> {
    fn new(input: &'a str) -> Self {
        JsonParser { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\n' | '\r') = self.peek() {
            self.advance();
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> DecodeError {
        DecodeError::InvalidJson {
            pos: self.pos,
            reason: reason.into(),
        }
    }

    fn unexpected(&self, ch: char) -> DecodeError {
        DecodeError::UnexpectedChar { ch, pos: self.pos }
    }

    fn parse_value(&mut self, depth: usize) -> Result<Value, DecodeError> {
        self.skip_whitespace();

        match self.peek() {
            None => Err(DecodeError::UnexpectedEnd),
            Some('n') => self.parse_literal("null", Value::Null),
            Some('t') => self.parse_literal("true", Value::Bool(true)),
            Some('f') => self.parse_literal("false", Value::Bool(false)),
            Some('"') => self.parse_string().map(Value::String),
            Some('[') => self.parse_array(depth + 1),
            Some('{') => self.parse_object(depth + 1),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            Some(c) => Err(self.unexpected(c)),
        }
    }

    fn parse_literal(&mut self, word: &str, value: Value) -> Result<Value, DecodeError> {
        if self.input[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(value)
        } else {
            Err(self.invalid(format!("expected '{word}'")))
        }
    }

    fn parse_string(&mut self) -> Result<String, DecodeError> {
        self.advance(); // opening quote
        let mut result = String::new();

        loop {
            match self.peek() {
                None => return Err(DecodeError::UnexpectedEnd),
                Some('"') => {
                    self.advance();
                    return Ok(result);
                }
                Some('\\') => {
                    self.advance();
                    let escaped = match self.peek() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('b') => '\x08',
                        Some('f') => '\x0c',
                        Some('u') => {
                            self.advance();
                            result.push(self.parse_unicode_escape()?);
                            continue;
                        }
                        Some(c) => return Err(self.invalid(format!("invalid escape \\{c}"))),
                        None => return Err(DecodeError::UnexpectedEnd),
                    };
                    result.push(escaped);
                    self.advance();
                }
                Some(c) if c < ' ' => {
                    return Err(self.invalid("control character in string"));
                }
                Some(c) => {
                    result.push(c);
                    self.advance();
                }
            }
        }
    }

    fn parse_hex4(&mut self) -> Result<u32, DecodeError> {
        let end = self.pos + 4;
        let hex = self
            .input
            .get(self.pos..end)
            .ok_or(DecodeError::UnexpectedEnd)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(self.invalid("invalid unicode escape"));
        }
        let code = u32::from_str_radix(hex, 16).map_err(|_| self.invalid("invalid unicode escape"))?;
        self.pos = end;
        Ok(code)
    }

    // Called after "\u"; combines surrogate pairs.
    fn parse_unicode_escape(&mut self) -> Result<char, DecodeError> {
        let high = self.parse_hex4()?;
        let code = if (0xD800..0xDC00).contains(&high) {
            if !self.input[self.pos..].starts_with("\\u") {
                return Err(self.invalid("unpaired surrogate"));
            }
            self.pos += 2;
            let low = self.parse_hex4()?;
            if !(0xDC00..0xE000).contains(&low) {
                return Err(self.invalid("unpaired surrogate"));
            }
            0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
        } else {
            high
        };
        char::from_u32(code).ok_or_else(|| self.invalid("invalid unicode codepoint"))
    }

    fn skip_digits(&mut self) -> usize {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }
        self.pos - start
    }

    fn parse_number(&mut self) -> Result<Value, DecodeError> {
        let start = self.pos;
        let invalid_number = |end: usize, input: &str| {
            DecodeError::InvalidNumber(input[start..end].to_string())
        };

        if self.peek() == Some('-') {
            self.advance();
        }

        let int_start = self.pos;
        let int_digits = self.skip_digits();
        if int_digits == 0 || (int_digits > 1 && self.input[int_start..].starts_with('0')) {
            return Err(invalid_number(self.pos, self.input));
        }

        let mut is_float = false;

        if self.peek() == Some('.') {
            is_float = true;
            self.advance();
            if self.skip_digits() == 0 {
                return Err(invalid_number(self.pos, self.input));
            }
        }

        if let Some('e' | 'E') = self.peek() {
            is_float = true;
            self.advance();
            if let Some('+' | '-') = self.peek() {
                self.advance();
            }
            if self.skip_digits() == 0 {
                return Err(invalid_number(self.pos, self.input));
            }
        }

        let num_str = &self.input[start..self.pos];

        if !is_float {
            if let Ok(i) = num_str.parse::<i64>() {
                return Ok(Value::Int(i));
            }
        }
        // Fractions, exponents and integers beyond i64 range
        num_str
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(|| DecodeError::InvalidNumber(num_str.to_string()))
    }

    fn parse_array(&mut self, depth: usize) -> Result<Value, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::TooDeep);
        }
        self.advance(); // '['
        self.skip_whitespace();

        let mut arr = Vec::new();

        if self.peek() == Some(']') {
            self.advance();
            return Ok(Value::Array(arr));
        }

        loop {
            arr.push(self.parse_value(depth)?);
            self.skip_whitespace();

            match self.peek() {
                Some(',') => self.advance(),
                Some(']') => {
                    self.advance();
                    return Ok(Value::Array(arr));
                }
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(DecodeError::UnexpectedEnd),
            }
        }
    }

    fn parse_object(&mut self, depth: usize) -> Result<Value, DecodeError> {
        if depth > MAX_DEPTH {
            return Err(DecodeError::TooDeep);
        }
        self.advance(); // '{'
        self.skip_whitespace();

        let mut map = ValueMap::new();

        if self.peek() == Some('}') {
            self.advance();
            return Ok(Value::Map(map));
        }

        loop {
            self.skip_whitespace();

            if self.peek() != Some('"') {
                return Err(self.invalid("expected string key"));
            }
            let key = self.parse_string()?;

            self.skip_whitespace();
            if self.peek() != Some(':') {
                return Err(self.invalid("expected ':'"));
            }
            self.advance();

            let value = self.parse_value(depth)?;
            map.insert(key, value);

            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.advance(),
                Some('}') => {
                    self.advance();
                    return Ok(Value::Map(map));
                }
                Some(c) => return Err(self.unexpected(c)),
                None => return Err(DecodeError::UnexpectedEnd),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Scalars ===

    #[test]
    fn test_decode_literals() {
        assert_eq!(decode_json("null").unwrap(), Value::Null);
        assert_eq!(decode_json("true").unwrap(), Value::Bool(true));
        assert_eq!(decode_json(" false ").unwrap(), Value::Bool(false));
    }

    #[test]
    fn test_decode_int_vs_float() {
        assert_eq!(decode_json("42").unwrap(), Value::Int(42));
        assert_eq!(decode_json("-7").unwrap(), Value::Int(-7));
        assert_eq!(decode_json("1.0").unwrap(), Value::Float(1.0));
        assert_eq!(decode_json("1e2").unwrap(), Value::Float(100.0));
    }

    #[test]
    fn test_decode_int_bounds() {
        assert_eq!(
            decode_json("-9223372036854775808").unwrap(),
            Value::Int(i64::MIN)
        );
        // One past i64::MAX falls back to float
        assert_eq!(
            decode_json("9223372036854775808").unwrap(),
            Value::Float(9223372036854775808.0)
        );
    }

    #[test]
    fn test_decode_rejects_bad_numbers() {
        for text in ["-", "01", "1.", "1e", ".5", "1e999"] {
            assert!(decode_json(text).is_err(), "{text} should be rejected");
        }
    }

    // === Strings ===

    #[test]
    fn test_decode_escapes() {
        assert_eq!(
            decode_json(r#""a\"b\\c\/d\n\t""#).unwrap(),
            Value::from("a\"b\\c/d\n\t")
        );
        assert_eq!(decode_json(r#""\u00e9""#).unwrap(), Value::from("é"));
    }

    #[test]
    fn test_decode_surrogate_pair() {
        assert_eq!(
            decode_json(r#""\ud83d\ude00""#).unwrap(),
            Value::from("\u{1F600}")
        );
        assert!(decode_json(r#""\ud83d""#).is_err());
    }

    #[test]
    fn test_decode_rejects_raw_control_character() {
        assert!(decode_json("\"a\nb\"").is_err());
    }

    // === Containers ===

    #[test]
    fn test_decode_object_keeps_order() {
        let value = decode_json(r#"{"z":1,"a":2,"m":3}"#).unwrap();
        let keys: Vec<_> = value.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_decode_duplicate_key_last_wins() {
        let value = decode_json(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_decode_wide_object() {
        let body: Vec<String> = (0..50_000).map(|i| format!(r#""f{i}":{i}"#)).collect();
        let value = decode_json(&format!("{{{}}}", body.join(","))).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 50_000);
        assert_eq!(map.get("f49999"), Some(&Value::Int(49_999)));
        assert_eq!(map.keys().next(), Some("f0"));
    }

    #[test]
    fn test_decode_nested() {
        let value = decode_json(r#"{"a":[1,{"b":null}],"c":{}}"#).unwrap();
        let a = value.as_map().unwrap().get("a").unwrap().as_array().unwrap();
        assert_eq!(a.len(), 2);
        assert_eq!(a[0], Value::Int(1));
    }

    // === Errors ===

    #[test]
    fn test_decode_errors() {
        assert_eq!(decode_json(""), Err(DecodeError::UnexpectedEnd));
        assert_eq!(decode_json("   "), Err(DecodeError::UnexpectedEnd));
        assert!(matches!(decode_json("[1,2"), Err(DecodeError::UnexpectedEnd)));
        assert!(matches!(
            decode_json("[1;2]"),
            Err(DecodeError::UnexpectedChar { ch: ';', .. })
        ));
        assert!(matches!(
            decode_json("{1:2}"),
            Err(DecodeError::InvalidJson { .. })
        ));
        assert_eq!(decode_json("1 2"), Err(DecodeError::TrailingCharacters(2)));
        assert!(decode_json("nul").is_err());
    }

    #[test]
    fn test_decode_depth_limit() {
        let deep = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
        assert_eq!(decode_json(&deep), Err(DecodeError::TooDeep));

        let ok = "[".repeat(MAX_DEPTH) + &"]".repeat(MAX_DEPTH);
        assert!(decode_json(&ok).is_ok());
    }
}
