//! Process-wide default engine
//!
//! The free functions in this module all act on one lazily built
//! [`Engine`] with the standard bindings. Registering a binding here
//! affects every later call in the process, from any thread.
//!
//! Code that needs isolated configuration builds its own engine with
//! [`Engine::builder`] instead.

use jsonbind_core::{Bindable, DomainType, DomainValue, Result, Shape, TypeInfo};
use jsonbind_engine::{Binding, Engine};
use once_cell::sync::Lazy;
use tracing::debug;

static GLOBAL: Lazy<Engine> = Lazy::new(|| {
    debug!("Initializing the process-wide engine");
    Engine::new()
});

/// The process-wide engine
pub fn global() -> &'static Engine {
    &GLOBAL
}

/// Serialize a value to compact JSON text
///
/// # Example
///
/// ```
/// assert_eq!(jsonbind::serialize(&42i64).unwrap(), "42");
/// ```
pub fn serialize(value: &dyn Bindable) -> Result<String> {
    GLOBAL.serialize(value)
}

/// Deserialize JSON text, optionally into a specific type
///
/// Without a target the top-level shape picks the type: `42` becomes an
/// `i64`, `[..]` a `List`, `{..}` a `Dict`.
pub fn deserialize(text: &str, target: Option<&TypeInfo>) -> Result<DomainValue> {
    GLOBAL.deserialize(text, target)
}

/// Deserialize JSON text into a `T`
pub fn deserialize_as<T: DomainType>(text: &str) -> Result<T> {
    GLOBAL.deserialize_as(text)
}

/// Register a binding, replacing any binding for the same exact type
pub fn register_binding(binding: impl Binding) {
    GLOBAL.register(binding);
}

/// Check if a binding resolves for `T`
pub fn is_bound<T: DomainType>() -> bool {
    GLOBAL.is_bound_type::<T>()
}

/// Change the implicit target for a shape
pub fn set_default(shape: Shape, info: TypeInfo) -> Result<()> {
    GLOBAL.set_default(shape, info)
}
