//! Primitive shape enumeration
//!
//! Every JSON value falls into exactly one of seven shapes. A binding
//! declares the shape its encoder produces; everything that is not one of
//! these shapes is a domain type and needs a binding to cross the wire.
//!
//! | Shape | JSON |
//! |-------|------|
//! | Null | `null` |
//! | Bool | `true` / `false` |
//! | Int | integral number |
//! | Float | number with fraction or exponent |
//! | String | `"..."` |
//! | Array | `[...]` |
//! | Map | `{...}` |

/// The seven JSON-native value shapes
///
/// ## Invariant
///
/// This set is closed. Bindings map domain types onto it, never extend it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// `null`
    Null,
    /// `true` / `false`
    Bool,
    /// Integral number
    Int,
    /// Floating-point number
    Float,
    /// UTF-8 string
    String,
    /// Ordered sequence
    Array,
    /// String-keyed object
    Map,
}

impl Shape {
    /// All shapes (for iteration)
    pub const ALL: [Shape; 7] = [
        Shape::Null,
        Shape::Bool,
        Shape::Int,
        Shape::Float,
        Shape::String,
        Shape::Array,
        Shape::Map,
    ];

    /// Get all shapes as a slice
    pub fn all() -> &'static [Shape] {
        &Self::ALL
    }

    /// Short identifier used in error messages
    pub const fn name(&self) -> &'static str {
        match self {
            Shape::Null => "null",
            Shape::Bool => "bool",
            Shape::Int => "int",
            Shape::Float => "float",
            Shape::String => "string",
            Shape::Array => "array",
            Shape::Map => "map",
        }
    }

    /// Parse from short identifier
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.name() == name)
    }

    /// Whether a value of shape `self` may be decoded by a binding that
    /// declares `declared`.
    ///
    /// JSON does not distinguish integers from floats, so an `Int` is
    /// accepted wherever a `Float` is expected. The reverse is not true.
    pub const fn conforms_to(&self, declared: Shape) -> bool {
        matches!(
            (self, declared),
            (Shape::Null, Shape::Null)
                | (Shape::Bool, Shape::Bool)
                | (Shape::Int, Shape::Int)
                | (Shape::Int, Shape::Float)
                | (Shape::Float, Shape::Float)
                | (Shape::String, Shape::String)
                | (Shape::Array, Shape::Array)
                | (Shape::Map, Shape::Map)
        )
    }

    /// Check if this shape holds nested values
    pub const fn is_container(&self) -> bool {
        matches!(self, Shape::Array | Shape::Map)
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_all() {
        let all = Shape::all();
        assert_eq!(all.len(), 7);
        assert!(all.contains(&Shape::Null));
        assert!(all.contains(&Shape::Map));
    }

    #[test]
    fn test_shape_name_roundtrip() {
        for shape in Shape::all() {
            assert_eq!(Shape::from_name(shape.name()), Some(*shape));
        }
        assert_eq!(Shape::from_name("tuple"), None);
    }

    #[test]
    fn test_int_conforms_to_float() {
        assert!(Shape::Int.conforms_to(Shape::Float));
        assert!(!Shape::Float.conforms_to(Shape::Int));
    }

    #[test]
    fn test_null_only_conforms_to_null() {
        for shape in Shape::all() {
            assert_eq!(Shape::Null.conforms_to(*shape), *shape == Shape::Null);
        }
    }

    #[test]
    fn test_containers() {
        assert!(Shape::Array.is_container());
        assert!(Shape::Map.is_container());
        assert!(!Shape::String.is_container());
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(format!("{}", Shape::Array), "array");
        assert_eq!(format!("{}", Shape::Float), "float");
    }
}
