//! Per-type record binding with a frozen schema
//!
//! Where [`ObjectBinding`](super::ObjectBinding) reads a record's members
//! afresh on every call, a `ClassBinding` inspects one default instance
//! when it is built and fixes the member names, their types and their
//! bindings. Later conversions are checked against that schema and never
//! consult the registry for members.

use super::wrong_kind;
use crate::binding::{decode_checked, encode_checked, Binding};
use crate::config::UnmatchedKeys;
use crate::engine::Engine;
use jsonbind_core::{
    is_reserved, BindError, Bindable, DomainValue, Members, Record, Result, Shape, TypeInfo,
    TypeKey, TypeKind, Value, ValueMap,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

struct Member {
    name: String,
    type_info: TypeInfo,
    binding: Arc<dyn Binding>,
}

/// Record binding for one type, with member bindings resolved up front
pub struct ClassBinding {
    domain: TypeKey,
    members: Vec<Member>,
    unmatched_keys: UnmatchedKeys,
}

impl ClassBinding {
    /// Freeze the schema of `T`
    ///
    /// Fails with `UnboundType` when a member's type has no binding in
    /// `engine`. Reserved members are not part of the schema.
    pub fn new<T: Record>(engine: &Engine) -> Result<Self> {
        let sample = T::default();
        let mut members = Vec::new();
        for (name, value) in sample.members() {
            if is_reserved(name) {
                continue;
            }
            let type_info = value.runtime_type();
            let binding = engine.resolve(&type_info)?;
            members.push(Member {
                name: name.to_string(),
                type_info,
                binding,
            });
        }
        let domain = TypeKey::of::<T>();
        debug!(record = %domain, members = members.len(), "Froze record schema");
        Ok(ClassBinding {
            domain,
            members,
            unmatched_keys: UnmatchedKeys::Reject,
        })
    }

    /// Policy for keys outside the schema
    pub fn with_unmatched_keys(mut self, policy: UnmatchedKeys) -> Self {
        self.unmatched_keys = policy;
        self
    }

    /// Member names in encode order
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.name.as_str())
    }

    fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }
}

impl fmt::Debug for ClassBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassBinding")
            .field("domain", &self.domain)
            .field("members", &self.member_names().collect::<Vec<_>>())
            .field("unmatched_keys", &self.unmatched_keys)
            .finish()
    }
}

impl Binding for ClassBinding {
    fn shape(&self) -> Shape {
        Shape::Map
    }

    fn domain_type(&self) -> TypeKey {
        self.domain
    }

    fn encode(&self, value: &dyn Bindable, engine: &Engine) -> Result<Value> {
        let runtime = value.runtime_type();
        let current = match runtime.kind() {
            TypeKind::Record(hooks) => (hooks.members)(value),
            _ => None,
        }
        .ok_or_else(|| wrong_kind(&self.domain.name(), &runtime))?;

        let mut map = ValueMap::with_capacity(self.members.len());
        for member in &self.members {
            let (_, item) = current
                .iter()
                .find(|(name, _)| *name == member.name)
                .ok_or_else(|| {
                    BindError::schema(self.domain.name(), format!("missing member {}", member.name))
                })?;
            if !item.runtime_type().is_a(member.type_info.key()) {
                return Err(BindError::schema(
                    self.domain.name(),
                    format!(
                        "member {} is a {}, expected {}",
                        member.name,
                        item.type_key(),
                        member.type_info.key()
                    ),
                ));
            }
            map.insert(member.name.as_str(), encode_checked(member.binding.as_ref(), *item, engine)?);
        }
        Ok(Value::Map(map))
    }

    fn decode(&self, value: &Value, target: &TypeInfo, engine: &Engine) -> Result<DomainValue> {
        let TypeKind::Record(hooks) = target.kind() else {
            return Err(wrong_kind(&self.domain.name(), target));
        };
        let map = value.as_map().ok_or_else(|| BindError::ShapeMismatch {
            type_name: target.name(),
            expected: Shape::Map,
            actual: value.shape(),
        })?;

        let mut members = Members::new(target.name());
        let mut dropped = Vec::new();
        for (key, item) in map.iter() {
            match self.member(key) {
                Some(member) => {
                    let decoded =
                        decode_checked(member.binding.as_ref(), item, &member.type_info, engine)?;
                    members.insert(key, decoded);
                }
                None if self.unmatched_keys == UnmatchedKeys::Attach => {
                    if hooks.open {
                        members.insert_extra(key, engine.decode_default(item)?);
                    } else {
                        dropped.push(key.to_string());
                    }
                }
                None => {
                    return Err(BindError::schema(
                        self.domain.name(),
                        format!("unexpected key {key:?}"),
                    ));
                }
            }
        }

        let record = (hooks.build)(&mut members)?;
        dropped.extend(members.extra_names());
        if !dropped.is_empty() {
            warn!(
                record = %self.domain,
                keys = ?dropped,
                "Dropped keys the record does not declare"
            );
        }
        Ok(record)
    }

    fn name(&self) -> &'static str {
        "ClassBinding"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonbind_core::{bind_record, DomainType, TypedList};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Sample {
        id: i64,
        tags: TypedList<String>,
        _scratch: String,
    }

    bind_record!(Sample { id: i64, tags: TypedList<String>, _scratch: String });

    #[derive(Debug, Clone, PartialEq)]
    struct Handle;

    impl DomainType for Handle {
        fn type_info() -> TypeInfo {
            TypeInfo::opaque::<Self>()
        }
    }

    impl Default for Handle {
        fn default() -> Self {
            Handle
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Holder {
        handle: Handle,
    }

    bind_record!(Holder { handle: Handle });

    fn sample() -> Sample {
        Sample {
            id: 7,
            tags: TypedList::from_items(["a".to_string(), "b".to_string()]).unwrap(),
            _scratch: String::new(),
        }
    }

    #[test]
    fn test_schema_is_frozen_from_default_instance() {
        let engine = Engine::new();
        let binding = ClassBinding::new::<Sample>(&engine).unwrap();
        assert_eq!(binding.member_names().collect::<Vec<_>>(), vec!["id", "tags"]);
        assert_eq!(binding.domain_type(), TypeKey::of::<Sample>());
    }

    #[test]
    fn test_debug_lists_frozen_members() {
        let engine = Engine::new();
        let binding = ClassBinding::new::<Sample>(&engine).unwrap();
        let text = format!("{binding:?}");
        assert!(text.contains(r#"members: ["id", "tags"]"#));
        assert!(text.contains("Reject"));
    }

    #[test]
    fn test_construction_fails_on_unbound_member() {
        let engine = Engine::new();
        let err = ClassBinding::new::<Holder>(&engine).unwrap_err();
        assert!(err.is_unbound());
    }

    #[test]
    fn test_round_trip_through_registered_class_binding() {
        let engine = Engine::new();
        engine.register(ClassBinding::new::<Sample>(&engine).unwrap());

        let text = engine.serialize(&sample()).unwrap();
        assert_eq!(text, r#"{"id":7,"tags":["a","b"]}"#);
        assert_eq!(engine.deserialize_as::<Sample>(&text).unwrap(), sample());
    }

    #[test]
    fn test_rejects_unknown_keys_by_default() {
        let engine = Engine::new();
        engine.register(ClassBinding::new::<Sample>(&engine).unwrap());

        let err = engine
            .deserialize_as::<Sample>(r#"{"id":1,"extra":true}"#)
            .unwrap_err();
        assert!(err.is_schema_violation());
    }

    #[test]
    fn test_attach_policy_ignores_unknown_keys() {
        let engine = Engine::new();
        let binding = ClassBinding::new::<Sample>(&engine)
            .unwrap()
            .with_unmatched_keys(UnmatchedKeys::Attach);
        engine.register(binding);

        let s: Sample = engine.deserialize_as(r#"{"id":1,"extra":true}"#).unwrap();
        assert_eq!(s.id, 1);
        assert!(s.tags.is_empty());
    }

    #[test]
    fn test_attach_policy_skips_decoding_unknown_keys() {
        let engine = Engine::new();
        engine
            .set_default(Shape::String, chrono::NaiveDateTime::type_info())
            .unwrap();
        let binding = ClassBinding::new::<Sample>(&engine)
            .unwrap()
            .with_unmatched_keys(UnmatchedKeys::Attach);
        engine.register(binding);

        let s: Sample = engine
            .deserialize_as(r#"{"id":2,"when":"not a date"}"#)
            .unwrap();
        assert_eq!(s.id, 2);
    }

    #[test]
    fn test_member_shape_is_checked() {
        let engine = Engine::new();
        engine.register(ClassBinding::new::<Sample>(&engine).unwrap());

        let err = engine.deserialize_as::<Sample>(r#"{"tags":[1]}"#).unwrap_err();
        assert!(matches!(err, BindError::ShapeMismatch { .. }));
    }
}
