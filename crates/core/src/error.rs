//! Error taxonomy for binding and serialization
//!
//! Every failure is returned to the immediate caller. Composite bindings
//! propagate member failures unchanged, so a record or list decode either
//! fully succeeds or returns the first member error.

use crate::shape::Shape;
use thiserror::Error;

/// All binding errors.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BindError {
    /// Input text is not valid JSON
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// Parser message
        reason: String,
    },

    /// No binding resolves for a type
    #[error("type {type_name} has no binding")]
    UnboundType {
        /// Requested or runtime type
        type_name: String,
    },

    /// `serialize` found no binding for the value's runtime type
    #[error("value of type {type_name} is not serializable")]
    NotSerializable {
        /// Runtime type of the value
        type_name: String,
    },

    /// `deserialize` found no binding for the (explicit or implicit) target
    #[error("type {type_name} is not deserializable")]
    NotDeserializable {
        /// Target type, or the shape when no default mapping exists
        type_name: String,
    },

    /// The primitive value present does not match what the binding declares
    #[error("shape mismatch for {type_name}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Type being converted
        type_name: String,
        /// Declared shape
        expected: Shape,
        /// Shape actually present
        actual: Shape,
    },

    /// Record, list or class schema was violated
    #[error("schema violation in {type_name}: {reason}")]
    SchemaViolation {
        /// Type whose schema was violated
        type_name: String,
        /// What went wrong
        reason: String,
    },

    /// By-value enumeration members do not share exactly one shape
    #[error("enumeration {type_name} has ambiguous member values: {reason}")]
    AmbiguousEnumValue {
        /// Enumeration type
        type_name: String,
        /// What made the values ambiguous
        reason: String,
    },

    /// Primitive value has the right shape but unusable content
    #[error("invalid value for {type_name}: {reason}")]
    InvalidValue {
        /// Type being converted
        type_name: String,
        /// What went wrong
        reason: String,
    },

    /// A date/time format string was rejected
    #[error("invalid format string {format:?}")]
    InvalidFormat {
        /// The rejected format
        format: String,
    },
}

/// Result type for binding operations.
pub type Result<T> = std::result::Result<T, BindError>;

impl BindError {
    /// Shorthand for [`BindError::SchemaViolation`]
    pub fn schema(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        BindError::SchemaViolation {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`BindError::InvalidValue`]
    pub fn invalid(type_name: impl Into<String>, reason: impl Into<String>) -> Self {
        BindError::InvalidValue {
            type_name: type_name.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error means a binding was missing.
    ///
    /// Callers may register a binding and retry.
    pub fn is_unbound(&self) -> bool {
        matches!(
            self,
            BindError::UnboundType { .. }
                | BindError::NotSerializable { .. }
                | BindError::NotDeserializable { .. }
        )
    }

    /// Check if this is a schema violation.
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, BindError::SchemaViolation { .. })
    }

    /// Check if the input text was not valid JSON.
    pub fn is_malformed(&self) -> bool {
        matches!(self, BindError::MalformedInput { .. })
    }
}
