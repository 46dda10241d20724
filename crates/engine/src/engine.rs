//! Serialization engine
//!
//! The engine ties the registry to the JSON codec:
//!
//! ```text
//! serialize:   domain value --resolve(runtime type)--> encode --> Value --> text
//! deserialize: text --> Value --resolve(target or default for shape)--> decode --> domain value
//! ```
//!
//! Composite bindings call back into [`Engine::encode`] and
//! [`Engine::decode`] for their members, so one resolution happens per
//! nested value.
//!
//! ## Default Mapping
//!
//! When `deserialize` has no target type, the incoming value's shape picks
//! one. The standard mapping is:
//!
//! | Shape | Domain type |
//! |-------|-------------|
//! | Null | `()` |
//! | Bool | `bool` |
//! | Int | `i64` |
//! | Float | `f64` |
//! | String | `String` |
//! | Array | `List` |
//! | Map | `Dict` |

use crate::binding::{decode_checked, encode_checked, Binding};
use crate::bindings::{
    BytesBinding, DateTimeBinding, DateTimeFormat, DictBinding, EnumNameBinding, ListBinding,
    ObjectBinding, ScalarBinding, SetBinding, TupleBinding,
};
use crate::config::{EngineBuilder, UnmatchedKeys};
use crate::registry::Registry;
use jsonbind_core::{
    downcast, BindError, Bindable, Dict, DomainType, DomainValue, List, Result, Shape, TypeInfo,
    Value,
};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Serialize and deserialize domain values through a binding registry
pub struct Engine {
    registry: Registry,
    defaults: RwLock<FxHashMap<Shape, TypeInfo>>,
}

impl Engine {
    /// Engine with the standard bindings and configuration
    pub fn new() -> Self {
        let engine = Self::empty();
        engine.install_standard(
            UnmatchedKeys::default(),
            DateTimeBinding::preset(DateTimeFormat::TimeStamp),
        );
        engine
    }

    /// Engine with no bindings and no default mapping
    pub fn empty() -> Self {
        Engine {
            registry: Registry::new(),
            defaults: RwLock::new(FxHashMap::default()),
        }
    }

    /// Start configuring an engine
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub(crate) fn install_standard(&self, unmatched_keys: UnmatchedKeys, datetime: DateTimeBinding) {
        self.register(ScalarBinding::<()>::new());
        self.register(ScalarBinding::<bool>::new());
        self.register(ScalarBinding::<i64>::new());
        self.register(ScalarBinding::<f64>::new());
        self.register(ScalarBinding::<String>::new());
        self.register(ListBinding);
        self.register(DictBinding);
        self.register(ObjectBinding::new(unmatched_keys));
        self.register(TupleBinding);
        self.register(SetBinding);
        self.register(EnumNameBinding);
        self.register(BytesBinding);
        self.register(datetime);

        let mut defaults = self.defaults.write();
        defaults.insert(Shape::Null, <()>::type_info());
        defaults.insert(Shape::Bool, bool::type_info());
        defaults.insert(Shape::Int, i64::type_info());
        defaults.insert(Shape::Float, f64::type_info());
        defaults.insert(Shape::String, String::type_info());
        defaults.insert(Shape::Array, List::type_info());
        defaults.insert(Shape::Map, Dict::type_info());
    }

    /// The underlying registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Register a binding, replacing any binding for the same exact type
    pub fn register(&self, binding: impl Binding) {
        self.registry.register(Arc::new(binding));
    }

    /// Register a shared binding
    pub fn register_arc(&self, binding: Arc<dyn Binding>) {
        self.registry.register(binding);
    }

    /// Resolve the binding for a type
    pub fn resolve(&self, info: &TypeInfo) -> Result<Arc<dyn Binding>> {
        self.registry.resolve(info)
    }

    /// Check if a binding resolves for a type
    pub fn is_bound(&self, info: &TypeInfo) -> bool {
        self.registry.is_bound(info)
    }

    /// Check if a binding resolves for `T`
    pub fn is_bound_type<T: DomainType>(&self) -> bool {
        self.is_bound(&T::type_info())
    }

    /// Check if a binding resolves for a value's runtime type
    pub fn is_serializable(&self, value: &dyn Bindable) -> bool {
        self.is_bound(&value.runtime_type())
    }

    /// Install `info` as the implicit target for `shape`
    ///
    /// Fails with `UnboundType` when `info` has no binding.
    pub fn set_default(&self, shape: Shape, info: TypeInfo) -> Result<()> {
        self.registry.resolve(&info)?;
        debug!(shape = %shape, domain_type = %info.key(), "Default mapping changed");
        self.defaults.write().insert(shape, info);
        Ok(())
    }

    /// The implicit target for `shape`
    pub fn default_for(&self, shape: Shape) -> Option<TypeInfo> {
        self.defaults.read().get(&shape).cloned()
    }

    /// Encode a domain value into a primitive value
    ///
    /// Dispatches on the value's runtime type. Fails with `NotSerializable`
    /// when no binding resolves.
    pub fn encode(&self, value: &dyn Bindable) -> Result<Value> {
        let runtime = value.runtime_type();
        let binding = self.registry.resolve(&runtime).map_err(|err| match err {
            BindError::UnboundType { type_name } => BindError::NotSerializable { type_name },
            other => other,
        })?;
        encode_checked(binding.as_ref(), value, self)
    }

    /// Decode a primitive value into an instance of `target`
    ///
    /// Fails with `NotDeserializable` when no binding resolves.
    pub fn decode(&self, value: &Value, target: &TypeInfo) -> Result<DomainValue> {
        let binding = self.registry.resolve(target).map_err(|err| match err {
            BindError::UnboundType { type_name } => BindError::NotDeserializable { type_name },
            other => other,
        })?;
        decode_checked(binding.as_ref(), value, target, self)
    }

    /// Decode a primitive value through the default mapping for its shape
    pub fn decode_default(&self, value: &Value) -> Result<DomainValue> {
        let shape = value.shape();
        let target = self
            .default_for(shape)
            .ok_or_else(|| BindError::NotDeserializable {
                type_name: shape.to_string(),
            })?;
        self.decode(value, &target)
    }

    /// Decode a primitive value into a `T`
    pub fn decode_as<T: DomainType>(&self, value: &Value) -> Result<T> {
        downcast::<T>(self.decode(value, &T::type_info())?)
    }

    /// Encode a typed value into a primitive value
    pub fn to_value<T: DomainType>(&self, value: &T) -> Result<Value> {
        self.encode(value)
    }

    /// Decode a primitive value into a `T`
    pub fn from_value<T: DomainType>(&self, value: &Value) -> Result<T> {
        self.decode_as(value)
    }

    /// Serialize a domain value to compact JSON text
    pub fn serialize(&self, value: &dyn Bindable) -> Result<String> {
        jsonbind_wire::render(&self.encode(value)?)
    }

    /// Deserialize JSON text
    ///
    /// Without a target the default mapping for the top-level shape is
    /// used.
    pub fn deserialize(&self, text: &str, target: Option<&TypeInfo>) -> Result<DomainValue> {
        let value = jsonbind_wire::parse(text)?;
        match target {
            Some(target) => self.decode(&value, target),
            None => self.decode_default(&value),
        }
    }

    /// Deserialize JSON text into a `T`
    pub fn deserialize_as<T: DomainType>(&self, text: &str) -> Result<T> {
        let value = jsonbind_wire::parse(text)?;
        self.decode_as(&value)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("registry", &self.registry)
            .field("defaults", &self.defaults.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonbind_core::{Object, TypedList};

    #[derive(Debug, Clone, PartialEq)]
    struct Unbound;

    impl DomainType for Unbound {
        fn type_info() -> TypeInfo {
            TypeInfo::opaque::<Self>()
        }
    }

    #[test]
    fn test_serialize_scalars() {
        let engine = Engine::new();
        assert_eq!(engine.serialize(&42i64).unwrap(), "42");
        assert_eq!(engine.serialize(&1.5f64).unwrap(), "1.5");
        assert_eq!(engine.serialize(&true).unwrap(), "true");
        assert_eq!(engine.serialize(&()).unwrap(), "null");
        assert_eq!(engine.serialize(&"hi".to_string()).unwrap(), "\"hi\"");
    }

    #[test]
    fn test_deserialize_default_mapping() {
        let engine = Engine::new();
        let v = engine.deserialize("42", None).unwrap();
        assert_eq!(v.downcast_ref::<i64>(), Some(&42));

        let v = engine.deserialize("[1, \"a\", null]", None).unwrap();
        let list = v.downcast_ref::<List>().unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.get(2).unwrap().is::<()>());

        let v = engine.deserialize(r#"{"a": {"b": 1.5}}"#, None).unwrap();
        let dict = v.downcast_ref::<Dict>().unwrap();
        let inner = dict.get_as::<Dict>("a").unwrap();
        assert_eq!(inner.get_as::<f64>("b"), Some(&1.5));
    }

    #[test]
    fn test_deserialize_with_target() {
        let engine = Engine::new();
        let v = engine.deserialize("3", Some(&f64::type_info())).unwrap();
        assert_eq!(v.downcast_ref::<f64>(), Some(&3.0));

        let list: TypedList<i64> = engine.deserialize_as("[1,2,3]").unwrap();
        assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_error_mapping() {
        let engine = Engine::new();
        assert!(matches!(
            engine.serialize(&Unbound),
            Err(BindError::NotSerializable { .. })
        ));
        assert!(matches!(
            engine.deserialize("1", Some(&Unbound::type_info())),
            Err(BindError::NotDeserializable { .. })
        ));
        assert!(engine.deserialize("[1,", None).unwrap_err().is_malformed());
        assert!(matches!(
            engine.deserialize_as::<i64>("\"x\""),
            Err(BindError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_engine_has_no_defaults() {
        let engine = Engine::empty();
        assert!(matches!(
            engine.deserialize("1", None),
            Err(BindError::NotDeserializable { .. })
        ));
        assert!(!engine.is_bound_type::<i64>());
    }

    #[test]
    fn test_set_default_requires_binding() {
        let engine = Engine::new();
        assert!(engine.set_default(Shape::Map, Unbound::type_info()).is_err());
        engine.set_default(Shape::Map, Object::type_info()).unwrap();

        let v = engine.deserialize(r#"{"x": 1}"#, None).unwrap();
        let object = v.downcast_ref::<Object>().unwrap();
        assert_eq!(object.get_as::<i64>("x"), Some(&1));
    }

    #[test]
    fn test_is_serializable() {
        let engine = Engine::new();
        assert!(engine.is_serializable(&1i64));
        assert!(engine.is_serializable(&vec![1u8, 2]));
        assert!(!engine.is_serializable(&Unbound));
    }

    #[test]
    fn test_value_level_round_trip() {
        let engine = Engine::new();
        let value = engine.to_value(&"abc".to_string()).unwrap();
        assert_eq!(value, Value::from("abc"));
        let back: String = engine.from_value(&value).unwrap();
        assert_eq!(back, "abc");
    }
}
