//! Date/time binding
//!
//! `NaiveDateTime` travels as a string rendered with a strftime-style
//! format. The format is fixed when the binding is built; registering a
//! new `DateTimeBinding` changes it for every later conversion.
//!
//! Parsing is lenient about fields the format does not carry: a missing
//! date becomes 1900-01-01 and a missing time becomes midnight.

use super::{build_target, expect_type};
use crate::binding::Binding;
use crate::engine::Engine;
use chrono::format::{parse, Item, ParseError, Parsed, StrftimeItems};
use chrono::NaiveDateTime;
use jsonbind_core::{BindError, Bindable, DomainValue, Result, Shape, TypeInfo, TypeKey, Value};
use std::fmt::Write;

/// Preset formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateTimeFormat {
    /// `2020-01-01 12:30:00.000000`
    #[default]
    TimeStamp,
    /// `2020-01-01`
    Date,
    /// `12:30:00.000000`
    Time,
    /// `12:30:00`
    ShortTime,
    /// `12:30`
    TinyTime,
}

impl DateTimeFormat {
    /// The strftime pattern
    pub const fn pattern(&self) -> &'static str {
        match self {
            DateTimeFormat::TimeStamp => "%Y-%m-%d %H:%M:%S%.6f",
            DateTimeFormat::Date => "%Y-%m-%d",
            DateTimeFormat::Time => "%H:%M:%S%.6f",
            DateTimeFormat::ShortTime => "%H:%M:%S",
            DateTimeFormat::TinyTime => "%H:%M",
        }
    }
}

/// Binding for `NaiveDateTime`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeBinding {
    format: String,
}

impl DateTimeBinding {
    /// Binding with a custom format
    ///
    /// Fails with `InvalidFormat` when the format is empty or contains an
    /// unknown specifier.
    pub fn new(format: impl Into<String>) -> Result<Self> {
        let format = format.into();
        if format.is_empty() || StrftimeItems::new(&format).any(|i| matches!(i, Item::Error)) {
            return Err(BindError::InvalidFormat { format });
        }
        Ok(DateTimeBinding { format })
    }

    /// Binding with a preset format
    pub fn preset(format: DateTimeFormat) -> Self {
        DateTimeBinding {
            format: format.pattern().to_string(),
        }
    }

    /// The active format
    pub fn format(&self) -> &str {
        &self.format
    }

    fn render(&self, value: &NaiveDateTime) -> Result<String> {
        let mut out = String::new();
        write!(out, "{}", value.format_with_items(StrftimeItems::new(&self.format)))
            .map_err(|_| BindError::invalid("NaiveDateTime", format!("cannot render with {:?}", self.format)))?;
        Ok(out)
    }

    fn read(&self, text: &str) -> Result<NaiveDateTime> {
        let invalid = |reason: String| BindError::invalid("NaiveDateTime", reason);

        let mut parsed = Parsed::new();
        parse(&mut parsed, text, StrftimeItems::new(&self.format))
            .map_err(|e| invalid(format!("{text:?} does not match {:?}: {e}", self.format)))?;

        let conflict = |e: ParseError| invalid(format!("{text:?} cannot take default fields: {e}"));

        // Only absent fields are defaulted.
        let date = match parsed.to_naive_date() {
            Ok(date) => date,
            Err(_) => {
                if parsed.year().is_none() {
                    parsed.set_year(1900).map_err(conflict)?;
                }
                if parsed.month().is_none() {
                    parsed.set_month(1).map_err(conflict)?;
                }
                if parsed.day().is_none() {
                    parsed.set_day(1).map_err(conflict)?;
                }
                parsed.to_naive_date().map_err(|e| invalid(e.to_string()))?
            }
        };
        let time = match parsed.to_naive_time() {
            Ok(time) => time,
            Err(_) => {
                if parsed.hour_mod_12().is_none() {
                    parsed.set_hour(0).map_err(conflict)?;
                } else if parsed.hour_div_12().is_none() {
                    parsed.set_ampm(false).map_err(conflict)?;
                }
                if parsed.minute().is_none() {
                    parsed.set_minute(0).map_err(conflict)?;
                }
                parsed.to_naive_time().map_err(|e| invalid(e.to_string()))?
            }
        };
        Ok(date.and_time(time))
    }
}

impl Default for DateTimeBinding {
    fn default() -> Self {
        Self::preset(DateTimeFormat::default())
    }
}

impl Binding for DateTimeBinding {
    fn shape(&self) -> Shape {
        Shape::String
    }

    fn domain_type(&self) -> TypeKey {
        TypeKey::of::<NaiveDateTime>()
    }

    fn encode(&self, value: &dyn Bindable, _engine: &Engine) -> Result<Value> {
        let value = expect_type::<NaiveDateTime>(value, "NaiveDateTime")?;
        self.render(&value).map(Value::String)
    }

    fn decode(&self, value: &Value, target: &TypeInfo, _engine: &Engine) -> Result<DomainValue> {
        let text = value.as_str().ok_or_else(|| BindError::ShapeMismatch {
            type_name: target.name(),
            expected: Shape::String,
            actual: value.shape(),
        })?;
        build_target(self.read(text)?, target)
    }
}
