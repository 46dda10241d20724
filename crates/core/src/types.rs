//! Host type descriptors
//!
//! This module defines how domain types describe themselves to the binding
//! registry:
//! - [`TypeKey`]: identity of a host type
//! - [`TypeInfo`]: a type's key, its declared ancestor chain and the hooks
//!   composite bindings use to take it apart and build it back
//! - [`DomainType`]: static capability every bindable type implements
//! - [`Bindable`]: object-safe view of a domain value, blanket-implemented
//!
//! Rust has no inheritance, so ancestry is declared. Capability markers
//! ([`AnyRecord`], [`AnyTuple`], [`AnySet`], [`AnyEnum`]) stand in for the
//! shared base of every record, tuple, set and enumeration type.
//!
//! ## Conversions
//!
//! A binding resolved through an ancestor only knows the ancestor's
//! concrete type. Opaque descendants declared with
//! [`TypeInfo::extends_via`] carry a pair of functions that convert to and
//! from each ancestor, so leaf bindings can encode them and build them.

use crate::collections::{SetHooks, TupleHooks};
use crate::enumeration::{EnumHooks, Enumeration};
use crate::error::{BindError, Result};
use crate::list::ListHooks;
use crate::record::{Record, RecordHooks};
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Identity of a host type
///
/// Equality and hashing use the `TypeId` only; the name is carried for
/// error messages.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Key for any `'static` type, including `dyn Trait` and markers
    pub fn of<T: ?Sized + 'static>() -> Self {
        TypeKey {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Underlying `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name
    pub fn qualified_name(&self) -> &'static str {
        self.name
    }

    /// Type name with module paths stripped (`Vec<u8>`, `TypedList<i64>`)
    pub fn name(&self) -> String {
        short_name(self.name)
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl std::hash::Hash for TypeKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeKey({})", self.name())
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

fn short_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment = String::new();
    let mut chars = full.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            segment.clear();
        } else if c.is_alphanumeric() || c == '_' {
            segment.push(c);
        } else {
            out.push_str(&segment);
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(&segment);
    out
}

/// Shared ancestor of every record type
pub enum AnyRecord {}

/// Shared ancestor of every tuple type
pub enum AnyTuple {}

/// Shared ancestor of every set type
pub enum AnySet {}

/// Shared ancestor of every enumeration type
pub enum AnyEnum {}

/// What a composite binding can do with a type
#[derive(Clone, Copy)]
pub enum TypeKind {
    /// No structure visible to bindings
    Opaque,
    /// Named members with declared types
    Record(RecordHooks),
    /// Checked list, optionally typed
    List(ListHooks),
    /// Fixed-arity heterogeneous sequence
    Tuple(TupleHooks),
    /// Unordered homogeneous collection
    Set(SetHooks),
    /// Closed set of named members
    Enumeration(EnumHooks),
}

impl TypeKind {
    /// Short label for error messages
    pub fn label(&self) -> &'static str {
        match self {
            TypeKind::Opaque => "opaque",
            TypeKind::Record(_) => "record",
            TypeKind::List(_) => "list",
            TypeKind::Tuple(_) => "tuple",
            TypeKind::Set(_) => "set",
            TypeKind::Enumeration(_) => "enumeration",
        }
    }
}

type UpcastFn = Arc<dyn Fn(&dyn Bindable) -> Option<DomainValue> + Send + Sync>;
type BuildFn = Arc<dyn Fn(DomainValue) -> Option<DomainValue> + Send + Sync>;

/// Conversion between a type and one of its ancestors
#[derive(Clone)]
struct Conversion {
    ancestor: TypeKey,
    upcast: UpcastFn,
    build: BuildFn,
}

/// Static descriptor of a host type
///
/// ## Invariant
///
/// `ancestors` is ordered most-derived first and never contains `key`.
#[derive(Clone)]
pub struct TypeInfo {
    key: TypeKey,
    ancestors: Vec<TypeKey>,
    kind: TypeKind,
    conversions: Vec<Conversion>,
}

impl TypeInfo {
    /// Create a descriptor with no ancestors
    pub fn new(key: TypeKey, kind: TypeKind) -> Self {
        TypeInfo {
            key,
            ancestors: Vec::new(),
            kind,
            conversions: Vec::new(),
        }
    }

    /// Descriptor of a `DomainType`
    pub fn of<T: DomainType>() -> Self {
        T::type_info()
    }

    /// Descriptor for a type without composite structure
    pub fn opaque<T: ?Sized + 'static>() -> Self {
        Self::new(TypeKey::of::<T>(), TypeKind::Opaque)
    }

    /// Descriptor for a record type, descending from [`AnyRecord`]
    pub fn record<T: Record>() -> Self {
        Self::new(TypeKey::of::<T>(), TypeKind::Record(RecordHooks::of::<T>()))
            .with_ancestor(TypeKey::of::<AnyRecord>())
    }

    /// Descriptor for an enumeration type, descending from [`AnyEnum`]
    pub fn enumeration<T: Enumeration>() -> Self {
        Self::new(
            TypeKey::of::<T>(),
            TypeKind::Enumeration(EnumHooks::of::<T>()),
        )
        .with_ancestor(TypeKey::of::<AnyEnum>())
    }

    /// Append an ancestor after the ones already declared
    pub fn with_ancestor(mut self, ancestor: TypeKey) -> Self {
        if ancestor != self.key && !self.ancestors.contains(&ancestor) {
            self.ancestors.push(ancestor);
        }
        self
    }

    /// Declare `parent` as the direct ancestor
    ///
    /// The parent's whole chain is placed before any ancestors this type
    /// already declared, keeping the most-derived-first order.
    pub fn extends(mut self, parent: &TypeInfo) -> Self {
        let mut chain: Vec<TypeKey> = parent.chain().filter(|k| *k != self.key).collect();
        for key in self.ancestors.drain(..) {
            if !chain.contains(&key) {
                chain.push(key);
            }
        }
        self.ancestors = chain;
        self
    }

    /// Declare `P` as the direct ancestor, with conversions both ways
    ///
    /// `upcast` turns a `T` into its parent and `build` makes a `T` from
    /// one. The parent's own conversions are chained, so a binding
    /// registered for any ancestor of `P` can also handle `T`. `T` must be
    /// the type this descriptor describes.
    ///
    /// ```
    /// use jsonbind_core::{DomainType, TypeInfo};
    ///
    /// #[derive(Debug, Clone, PartialEq)]
    /// struct Meters(f64);
    ///
    /// impl DomainType for Meters {
    ///     fn type_info() -> TypeInfo {
    ///         TypeInfo::opaque::<Self>().extends_via::<Meters, f64>(|m| m.0, Meters)
    ///     }
    /// }
    ///
    /// let info = Meters::type_info();
    /// let up = info.upcast(&Meters(2.5), f64::type_info().key()).unwrap();
    /// assert_eq!(up.downcast_ref::<f64>(), Some(&2.5));
    /// ```
    pub fn extends_via<T: DomainType, P: DomainType>(
        self,
        upcast: fn(&T) -> P,
        build: fn(P) -> T,
    ) -> Self {
        let parent = P::type_info();
        let mut info = self.extends(&parent);

        let up: UpcastFn = Arc::new(move |value: &dyn Bindable| {
            value
                .downcast_ref::<T>()
                .map(|v| Box::new(upcast(v)) as DomainValue)
        });
        let down: BuildFn = Arc::new(move |value: DomainValue| {
            value
                .into_any()
                .downcast::<P>()
                .ok()
                .map(|p| Box::new(build(*p)) as DomainValue)
        });

        let mut conversions = vec![Conversion {
            ancestor: parent.key(),
            upcast: Arc::clone(&up),
            build: Arc::clone(&down),
        }];
        for via in &parent.conversions {
            let (up, parent_up) = (Arc::clone(&up), Arc::clone(&via.upcast));
            let (down, parent_build) = (Arc::clone(&down), Arc::clone(&via.build));
            conversions.push(Conversion {
                ancestor: via.ancestor,
                upcast: Arc::new(move |value: &dyn Bindable| {
                    up(value).and_then(|p| parent_up(&*p))
                }),
                build: Arc::new(move |value: DomainValue| parent_build(value).and_then(|p| down(p))),
            });
        }
        for conversion in conversions {
            if !info.conversions.iter().any(|c| c.ancestor == conversion.ancestor) {
                info.conversions.push(conversion);
            }
        }
        info
    }

    /// Convert an instance of this type into an instance of `ancestor`
    ///
    /// `None` when no conversion to `ancestor` was declared or `value` is
    /// not an instance of this type.
    pub fn upcast(&self, value: &dyn Bindable, ancestor: TypeKey) -> Option<DomainValue> {
        self.conversions
            .iter()
            .find(|c| c.ancestor == ancestor)
            .and_then(|c| (c.upcast)(value))
    }

    /// Build an instance of this type from an instance of `ancestor`
    pub fn build_from(&self, value: DomainValue, ancestor: TypeKey) -> Option<DomainValue> {
        self.conversions
            .iter()
            .find(|c| c.ancestor == ancestor)
            .and_then(|c| (c.build)(value))
    }

    /// This type's key
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Readable type name
    pub fn name(&self) -> String {
        self.key.name()
    }

    /// Declared ancestors, most-derived first
    pub fn ancestors(&self) -> &[TypeKey] {
        &self.ancestors
    }

    /// Composite hooks
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    /// This type followed by its ancestors
    pub fn chain(&self) -> impl Iterator<Item = TypeKey> + '_ {
        std::iter::once(self.key).chain(self.ancestors.iter().copied())
    }

    /// Check if this type is `key` or descends from it
    pub fn is_a(&self, key: TypeKey) -> bool {
        self.key == key || self.ancestors.contains(&key)
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("type", &self.key.name())
            .field("kind", &self.kind.label())
            .field(
                "ancestors",
                &self.ancestors.iter().map(TypeKey::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// A type that can be bound to a JSON shape
///
/// Implementations only describe the type; the conversion itself lives in
/// a binding registered with the engine.
pub trait DomainType: Any + Clone + PartialEq + fmt::Debug + Send + Sync {
    /// Static descriptor of this type
    fn type_info() -> TypeInfo;
}

/// Type-erased domain value
///
/// Blanket-implemented for every [`DomainType`]; use it as `&dyn Bindable`
/// or [`DomainValue`] when the concrete type is only known at runtime.
pub trait Bindable: Any + fmt::Debug + Send + Sync {
    /// Descriptor of the concrete runtime type
    fn runtime_type(&self) -> TypeInfo;

    /// Borrow as `Any` for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutably borrow as `Any` for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Convert into `Any` for owned downcasting
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Clone behind a box
    fn clone_boxed(&self) -> DomainValue;

    /// Equality against another erased value of possibly different type
    fn eq_dyn(&self, other: &dyn Bindable) -> bool;
}

/// Owned type-erased domain value
pub type DomainValue = Box<dyn Bindable>;

impl<T: DomainType> Bindable for T {
    fn runtime_type(&self) -> TypeInfo {
        T::type_info()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_boxed(&self) -> DomainValue {
        Box::new(self.clone())
    }

    fn eq_dyn(&self, other: &dyn Bindable) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }
}

impl dyn Bindable {
    /// Check the concrete type
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Borrow as a concrete type
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    /// Key of the concrete runtime type
    pub fn type_key(&self) -> TypeKey {
        self.runtime_type().key()
    }
}

impl Clone for Box<dyn Bindable> {
    fn clone(&self) -> Self {
        (**self).clone_boxed()
    }
}

impl PartialEq for Box<dyn Bindable> {
    fn eq(&self, other: &Self) -> bool {
        (**self).eq_dyn(&**other)
    }
}

/// Move a type-erased value back into its concrete type
///
/// Fails with `SchemaViolation` naming both types when `value` is not a `T`.
pub fn downcast<T: DomainType>(value: DomainValue) -> Result<T> {
    let actual = value.type_key();
    value.into_any().downcast::<T>().map(|b| *b).map_err(|_| {
        BindError::schema(
            TypeKey::of::<T>().name(),
            format!("expected a {}, got a {}", TypeKey::of::<T>(), actual),
        )
    })
}

macro_rules! opaque_domain_types {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl DomainType for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::opaque::<Self>()
                }
            }
        )+
    };
}

opaque_domain_types!((), bool, i64, f64, String, Vec<u8>, chrono::NaiveDateTime);
