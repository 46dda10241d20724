//! Engine configuration
//!
//! An [`Engine`] is configured once, at build time. Everything that can be
//! changed later (bindings, default mappings) is changed through the
//! engine itself.
//!
//! ```
//! use jsonbind_engine::{EngineBuilder, UnmatchedKeys};
//!
//! let engine = EngineBuilder::new()
//!     .unmatched_keys(UnmatchedKeys::Reject)
//!     .datetime_format("%Y-%m-%d")
//!     .build()
//!     .unwrap();
//! assert!(engine.registry().len() > 0);
//! ```

use crate::bindings::{DateTimeBinding, DateTimeFormat};
use crate::engine::Engine;
use jsonbind_core::{Result, Shape, TypeInfo};

/// What record decode does with keys the record does not declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnmatchedKeys {
    /// Fail with `SchemaViolation`
    Reject,
    /// Decode the value through the default mapping and offer it to the
    /// record; records that cannot hold it drop it with a warning
    #[default]
    Attach,
}

/// Builder for [`Engine`]
#[derive(Debug, Clone)]
pub struct EngineBuilder {
    standard_bindings: bool,
    unmatched_keys: UnmatchedKeys,
    datetime_format: Option<String>,
    defaults: Vec<(Shape, TypeInfo)>,
}

impl EngineBuilder {
    /// Builder with the standard bindings, lenient records and the
    /// microsecond timestamp format
    pub fn new() -> Self {
        EngineBuilder {
            standard_bindings: true,
            unmatched_keys: UnmatchedKeys::default(),
            datetime_format: None,
            defaults: Vec::new(),
        }
    }

    /// Install the standard bindings and default mapping
    pub fn standard_bindings(mut self, enabled: bool) -> Self {
        self.standard_bindings = enabled;
        self
    }

    /// Policy of the generic record binding
    pub fn unmatched_keys(mut self, policy: UnmatchedKeys) -> Self {
        self.unmatched_keys = policy;
        self
    }

    /// Format string of the date/time binding
    pub fn datetime_format(mut self, format: impl Into<String>) -> Self {
        self.datetime_format = Some(format.into());
        self
    }

    /// Override the implicit target type for a shape
    pub fn default_type(mut self, shape: Shape, info: TypeInfo) -> Self {
        self.defaults.push((shape, info));
        self
    }

    /// Build the engine
    ///
    /// Fails with `InvalidFormat` on a rejected date/time format and with
    /// `UnboundType` when a default type has no binding.
    pub fn build(self) -> Result<Engine> {
        let engine = Engine::empty();
        if self.standard_bindings {
            let datetime = match &self.datetime_format {
                Some(format) => DateTimeBinding::new(format.as_str())?,
                None => DateTimeBinding::preset(DateTimeFormat::TimeStamp),
            };
            engine.install_standard(self.unmatched_keys, datetime);
        }
        for (shape, info) in self.defaults {
            engine.set_default(shape, info)?;
        }
        Ok(engine)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
