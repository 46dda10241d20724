//! Checked lists
//!
//! A [`List`] is an ordered sequence of domain values with an optional
//! element type. Every insertion path checks the incoming value:
//!
//! - with an element type, the value must be an instance of it (or a
//!   subtype); integers widen to floats when the element type is `f64`
//! - null (`()`) is rejected unless the list allows empty elements
//!
//! A list owns its elements, so it can never contain itself.
//!
//! [`TypedList<T>`] fixes the element type at compile time and descends
//! from `List`.

use crate::error::{BindError, Result};
use crate::record::{is_reserved, Members, Object, RecordHooks};
use crate::types::{
    downcast, Bindable, DomainType, DomainValue, TypeInfo, TypeKey, TypeKind,
};
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

/// What list searches do when nothing matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotFoundBehavior {
    /// Return an error
    #[default]
    Error,
    /// Return `None`
    Absent,
}

/// How an ordered search matches the target key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchType {
    /// Key equal to the target
    #[default]
    Exact,
    /// Greatest key not above the target
    Floor,
    /// Smallest key not below the target
    Ceiling,
}

/// Order a list is sorted in for ordered searches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Smallest key first
    #[default]
    Ascending,
    /// Greatest key first
    Descending,
}

/// List hooks stored in a [`TypeInfo`]
#[derive(Clone, Copy)]
pub struct ListHooks {
    /// Declared element type, if any
    pub element: fn() -> Option<TypeInfo>,
    /// Whether decoded lists admit null elements
    pub allow_empty: bool,
    /// Borrow the underlying list, `None` when the value is not this type
    pub view: fn(&dyn Bindable) -> Option<&List>,
    /// Wrap a decoded list into this type
    pub build: fn(List) -> DomainValue,
}

impl ListHooks {
    fn untyped() -> Self {
        ListHooks {
            element: || None,
            allow_empty: true,
            view: view_untyped,
            build: build_untyped,
        }
    }

    fn typed<T: DomainType>() -> Self {
        ListHooks {
            element: element_of::<T>,
            allow_empty: false,
            view: view_typed::<T>,
            build: build_typed::<T>,
        }
    }
}

fn view_untyped(value: &dyn Bindable) -> Option<&List> {
    value.downcast_ref::<List>()
}

fn build_untyped(list: List) -> DomainValue {
    Box::new(list)
}

fn element_of<T: DomainType>() -> Option<TypeInfo> {
    Some(T::type_info())
}

fn view_typed<T: DomainType>(value: &dyn Bindable) -> Option<&List> {
    value.downcast_ref::<TypedList<T>>().map(TypedList::as_list)
}

fn build_typed<T: DomainType>(list: List) -> DomainValue {
    Box::new(TypedList::<T> {
        list,
        _element: PhantomData,
    })
}

/// Ordered sequence of domain values with checked insertion
#[derive(Debug, Clone)]
pub struct List {
    element: Option<TypeInfo>,
    allow_empty: bool,
    items: Vec<DomainValue>,
}

impl List {
    /// Create an untyped list that rejects null elements
    pub fn new() -> Self {
        List {
            element: None,
            allow_empty: false,
            items: Vec::new(),
        }
    }

    /// Create a list whose elements must be `T`
    pub fn typed<T: DomainType>() -> Self {
        Self::of(T::type_info())
    }

    /// Create a list with a runtime element type
    pub fn of(element: TypeInfo) -> Self {
        List {
            element: Some(element),
            allow_empty: false,
            items: Vec::new(),
        }
    }

    /// Set whether null elements are admitted
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    /// Push every value, failing on the first rejected one
    pub fn with_items<V: Bindable>(mut self, items: impl IntoIterator<Item = V>) -> Result<Self> {
        self.extend(items)?;
        Ok(self)
    }

    /// Declared element type
    pub fn element_type(&self) -> Option<&TypeInfo> {
        self.element.as_ref()
    }

    /// Whether null elements are admitted
    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    /// Validate a value for insertion, applying int-to-float widening
    pub fn check(&self, value: DomainValue) -> Result<DomainValue> {
        if value.is::<()>() {
            return if self.allow_empty {
                Ok(value)
            } else {
                Err(BindError::schema(
                    self.type_name(),
                    "null elements are not allowed",
                ))
            };
        }
        let Some(element) = &self.element else {
            return Ok(value);
        };
        if element.key() == TypeKey::of::<f64>() {
            if let Some(i) = value.downcast_ref::<i64>() {
                return Ok(Box::new(*i as f64));
            }
        }
        if value.runtime_type().is_a(element.key()) {
            Ok(value)
        } else {
            Err(BindError::schema(
                self.type_name(),
                format!(
                    "element of type {} is not a {}",
                    value.type_key(),
                    element.key()
                ),
            ))
        }
    }

    /// Append a value
    pub fn push(&mut self, value: impl Bindable) -> Result<()> {
        self.push_boxed(Box::new(value))
    }

    /// Append an erased value
    pub fn push_boxed(&mut self, value: DomainValue) -> Result<()> {
        let value = self.check(value)?;
        self.items.push(value);
        Ok(())
    }

    /// Insert a value at `index`, shifting later elements
    pub fn insert(&mut self, index: usize, value: impl Bindable) -> Result<()> {
        self.insert_boxed(index, Box::new(value))
    }

    /// Insert an erased value at `index`
    pub fn insert_boxed(&mut self, index: usize, value: DomainValue) -> Result<()> {
        if index > self.items.len() {
            return Err(self.out_of_range(index));
        }
        let value = self.check(value)?;
        self.items.insert(index, value);
        Ok(())
    }

    /// Replace the element at `index`, returning the old one
    pub fn set(&mut self, index: usize, value: impl Bindable) -> Result<DomainValue> {
        self.set_boxed(index, Box::new(value))
    }

    /// Replace the element at `index` with an erased value
    pub fn set_boxed(&mut self, index: usize, value: DomainValue) -> Result<DomainValue> {
        if index >= self.items.len() {
            return Err(self.out_of_range(index));
        }
        let value = self.check(value)?;
        Ok(std::mem::replace(&mut self.items[index], value))
    }

    /// Append every value
    ///
    /// All values are checked before any is appended.
    pub fn extend<V: Bindable>(&mut self, values: impl IntoIterator<Item = V>) -> Result<()> {
        self.extend_boxed(values.into_iter().map(|v| Box::new(v) as DomainValue))
    }

    /// Append every erased value, all or nothing
    pub fn extend_boxed(&mut self, values: impl IntoIterator<Item = DomainValue>) -> Result<()> {
        let checked = values
            .into_iter()
            .map(|v| self.check(v))
            .collect::<Result<Vec<_>>>()?;
        self.items.extend(checked);
        Ok(())
    }

    /// Borrow the element at `index`
    pub fn get(&self, index: usize) -> Option<&dyn Bindable> {
        self.items.get(index).map(|v| v.as_ref())
    }

    /// Borrow the element at `index` as a concrete type
    pub fn get_as<T: DomainType>(&self, index: usize) -> Option<&T> {
        self.get(index)?.downcast_ref::<T>()
    }

    /// Remove and return the element at `index`
    pub fn remove(&mut self, index: usize) -> Option<DomainValue> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Remove every element
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate elements
    pub fn iter(&self) -> impl Iterator<Item = &dyn Bindable> {
        self.items.iter().map(|v| v.as_ref())
    }

    /// New list of the same element type holding the matching elements
    pub fn filter(&self, predicate: impl Fn(&dyn Bindable) -> bool) -> List {
        List {
            element: self.element.clone(),
            allow_empty: self.allow_empty,
            items: self
                .items
                .iter()
                .filter(|v| predicate(v.as_ref()))
                .cloned()
                .collect(),
        }
    }

    /// Index of the first element matching `predicate`
    pub fn find_first_index(
        &self,
        predicate: impl Fn(&dyn Bindable) -> bool,
        behavior: NotFoundBehavior,
    ) -> Result<Option<usize>> {
        let found = self.items.iter().position(|v| predicate(v.as_ref()));
        self.found_or(found, behavior)
    }

    /// First element matching `predicate`
    pub fn find_first(
        &self,
        predicate: impl Fn(&dyn Bindable) -> bool,
        behavior: NotFoundBehavior,
    ) -> Result<Option<&dyn Bindable>> {
        Ok(self
            .find_first_index(predicate, behavior)?
            .and_then(|index| self.get(index)))
    }

    /// Partition into sublists by key, in order of first appearance
    pub fn split_by<K: PartialEq>(&self, key: impl Fn(&dyn Bindable) -> K) -> Vec<(K, List)> {
        let mut groups: Vec<(K, List)> = Vec::new();
        for item in &self.items {
            let k = key(item.as_ref());
            let group = match groups.iter().position(|(g, _)| *g == k) {
                Some(index) => &mut groups[index].1,
                None => {
                    let empty = List {
                        element: self.element.clone(),
                        allow_empty: self.allow_empty,
                        items: Vec::new(),
                    };
                    groups.push((k, empty));
                    let last = groups.len() - 1;
                    &mut groups[last].1
                }
            };
            group.items.push(item.clone());
        }
        groups
    }

    /// Index of an element of a list sorted by `key`, by binary search
    ///
    /// With repeated keys `Exact` finds the first match in list order. The
    /// result is unspecified when the list is not sorted in `order`.
    pub fn find_ordered_index<K: PartialOrd>(
        &self,
        target: &K,
        key: impl Fn(&dyn Bindable) -> K,
        search: SearchType,
        order: SortOrder,
        behavior: NotFoundBehavior,
    ) -> Result<Option<usize>> {
        let key_of = |v: &DomainValue| key(v.as_ref());
        // `start` is the first element not ordered before the target and
        // `end` the first element ordered after it.
        let (start, end) = match order {
            SortOrder::Ascending => (
                self.items.partition_point(|v| key_of(v) < *target),
                self.items.partition_point(|v| key_of(v) <= *target),
            ),
            SortOrder::Descending => (
                self.items.partition_point(|v| key_of(v) > *target),
                self.items.partition_point(|v| key_of(v) >= *target),
            ),
        };
        let found = match (search, order) {
            (SearchType::Exact, _) => (start < end).then_some(start),
            (SearchType::Ceiling, SortOrder::Ascending)
            | (SearchType::Floor, SortOrder::Descending) => {
                (start < self.items.len()).then_some(start)
            }
            (SearchType::Floor, SortOrder::Ascending)
            | (SearchType::Ceiling, SortOrder::Descending) => end.checked_sub(1),
        };
        self.found_or(found, behavior)
    }

    /// Element of a list sorted by `key`, by binary search
    pub fn find_ordered<K: PartialOrd>(
        &self,
        target: &K,
        key: impl Fn(&dyn Bindable) -> K,
        search: SearchType,
        order: SortOrder,
        behavior: NotFoundBehavior,
    ) -> Result<Option<&dyn Bindable>> {
        Ok(self
            .find_ordered_index(target, key, search, order, behavior)?
            .and_then(|index| self.get(index)))
    }

    /// New untyped list holding `f` applied to every element
    pub fn process<V: DomainType>(&self, f: impl Fn(&dyn Bindable) -> V) -> Result<List> {
        List::new()
            .allow_empty(self.allow_empty)
            .with_items(self.iter().map(f))
    }

    /// Untyped list of every element's leaf values
    ///
    /// Record and object elements become lists of their member values,
    /// with members that are closed records flattened depth-first and
    /// reserved members skipped.
    /// Nested lists are handled recursively; other elements are copied.
    pub fn get_values(&self) -> List {
        List {
            element: None,
            allow_empty: true,
            items: self.items.iter().map(|v| values_of(v.as_ref())).collect(),
        }
    }

    /// Append elements rebuilt from leaf values, the inverse of
    /// [`List::get_values`]
    ///
    /// When the element type is a record other than `Object`, every value
    /// must be a list of member values in declaration order. Other values
    /// are appended unchanged. Nothing is appended when any value fails.
    pub fn set_values(&mut self, values: Vec<DomainValue>) -> Result<()> {
        let record = self
            .element
            .as_ref()
            .and_then(|e| closed_record(e).map(|hooks| (e, hooks)));
        let rebuilt = match record {
            Some((element, hooks)) => values
                .into_iter()
                .map(|value| {
                    let leaves = value.into_any().downcast::<List>().map_err(|_| {
                        BindError::schema(self.type_name(), "expected a list of member values")
                    })?;
                    let mut leaves = leaves.items.into_iter();
                    let built = build_from_leaves(element, hooks, &mut leaves)?;
                    match leaves.next() {
                        Some(_) => Err(BindError::schema(element.name(), "too many member values")),
                        None => Ok(built),
                    }
                })
                .collect::<Result<Vec<_>>>()?,
            None => values,
        };
        self.extend_boxed(rebuilt)
    }

    /// Render every element through `template` and concatenate
    ///
    /// `{}` stands for the element and `{name}` for a member of a record
    /// element; dotted names descend into nested records and objects.
    /// `{{` and `}}` are literal braces. Nested lists are rendered element
    /// by element.
    pub fn format(&self, template: &str) -> Result<String> {
        let mut out = String::new();
        for item in self.iter() {
            match list_view(item) {
                Some(nested) => out.push_str(&nested.format(template)?),
                None => format_item(item, template, &mut out)?,
            }
        }
        Ok(out)
    }

    /// Convert into a statically typed list
    ///
    /// Fails when any element is not a `T`.
    pub fn into_typed<T: DomainType>(self) -> Result<TypedList<T>> {
        let mut typed = TypedList::<T>::new().allow_empty(self.allow_empty);
        typed.list.extend_boxed(self.items)?;
        Ok(typed)
    }

    /// Take the elements out
    pub fn into_items(self) -> Vec<DomainValue> {
        self.items
    }

    fn type_name(&self) -> String {
        match &self.element {
            Some(element) => format!("List<{}>", element.key()),
            None => "List".to_string(),
        }
    }

    fn found_or(&self, found: Option<usize>, behavior: NotFoundBehavior) -> Result<Option<usize>> {
        match (found, behavior) {
            (Some(index), _) => Ok(Some(index)),
            (None, NotFoundBehavior::Absent) => Ok(None),
            (None, NotFoundBehavior::Error) => Err(BindError::schema(
                self.type_name(),
                "no element matches",
            )),
        }
    }

    fn out_of_range(&self, index: usize) -> BindError {
        BindError::schema(
            self.type_name(),
            format!("index {index} out of range for length {}", self.items.len()),
        )
    }
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

fn list_view(value: &dyn Bindable) -> Option<&List> {
    let info = value.runtime_type();
    match info.kind() {
        TypeKind::List(hooks) => (hooks.view)(value),
        _ => None,
    }
}

fn record_members(value: &dyn Bindable) -> Option<Vec<(&str, &dyn Bindable)>> {
    let info = value.runtime_type();
    match info.kind() {
        TypeKind::Record(hooks) => (hooks.members)(value),
        _ => None,
    }
}

fn closed_record(info: &TypeInfo) -> Option<&RecordHooks> {
    match info.kind() {
        TypeKind::Record(hooks) if !hooks.open => Some(hooks),
        _ => None,
    }
}

fn values_of(value: &dyn Bindable) -> DomainValue {
    if let Some(list) = list_view(value) {
        return Box::new(list.get_values());
    }
    match record_members(value) {
        Some(members) => {
            let mut leaves = Vec::new();
            flatten_members(members, &mut leaves);
            Box::new(List {
                element: None,
                allow_empty: true,
                items: leaves,
            })
        }
        None => value.clone_boxed(),
    }
}

fn flatten_members(members: Vec<(&str, &dyn Bindable)>, out: &mut Vec<DomainValue>) {
    for (name, member) in members {
        if is_reserved(name) {
            continue;
        }
        let nested = closed_record(&member.runtime_type())
            .is_some()
            .then(|| record_members(member))
            .flatten();
        match nested {
            Some(inner) => flatten_members(inner, out),
            None => out.push(member.clone_boxed()),
        }
    }
}

fn build_from_leaves(
    info: &TypeInfo,
    hooks: &RecordHooks,
    leaves: &mut dyn Iterator<Item = DomainValue>,
) -> Result<DomainValue> {
    let mut members = Members::new(info.name());
    for field in (hooks.fields)() {
        if is_reserved(field.name()) {
            continue;
        }
        let value = match closed_record(field.type_info()) {
            Some(nested) => build_from_leaves(field.type_info(), nested, leaves)?,
            None => leaves.next().ok_or_else(|| {
                BindError::schema(info.name(), format!("no value for member {}", field.name()))
            })?,
        };
        members.insert(field.name(), value);
    }
    (hooks.build)(&mut members)
}

fn format_item(item: &dyn Bindable, template: &str, out: &mut String) -> Result<()> {
    let malformed = || BindError::InvalidFormat {
        format: template.to_string(),
    };
    let mut rest = template;
    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with("{{") || tail.starts_with("}}") {
            out.push_str(&tail[..1]);
            rest = &tail[2..];
        } else if tail.starts_with('}') {
            return Err(malformed());
        } else {
            let end = tail.find('}').ok_or_else(malformed)?;
            let name = &tail[1..end];
            let value = if name.is_empty() {
                item
            } else {
                member_at(item, name).ok_or_else(|| {
                    BindError::schema(item.type_key().name(), format!("no member {name}"))
                })?
            };
            out.push_str(&display(value));
            rest = &tail[end + 1..];
        }
    }
    out.push_str(rest);
    Ok(())
}

fn member_at<'a>(value: &'a dyn Bindable, path: &str) -> Option<&'a dyn Bindable> {
    if let Some(object) = value.downcast_ref::<Object>() {
        return object.get(path);
    }
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };
    let (_, member) = record_members(value)?
        .into_iter()
        .find(|(name, _)| *name == head)?;
    match rest {
        Some(rest) => member_at(member, rest),
        None => Some(member),
    }
}

fn display(value: &dyn Bindable) -> String {
    if let Some(s) = value.downcast_ref::<String>() {
        s.clone()
    } else if let Some(i) = value.downcast_ref::<i64>() {
        i.to_string()
    } else if let Some(f) = value.downcast_ref::<f64>() {
        f.to_string()
    } else if let Some(b) = value.downcast_ref::<bool>() {
        b.to_string()
    } else if value.is::<()>() {
        "null".to_string()
    } else {
        format!("{value:?}")
    }
}

/// Element-wise equality; element type and null policy are not compared
impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl DomainType for List {
    fn type_info() -> TypeInfo {
        TypeInfo::new(TypeKey::of::<Self>(), TypeKind::List(ListHooks::untyped()))
    }
}

/// List whose element type is fixed to `T`
#[derive(Debug, Clone, PartialEq)]
pub struct TypedList<T> {
    list: List,
    _element: PhantomData<fn() -> T>,
}

impl<T: DomainType> TypedList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        TypedList {
            list: List::typed::<T>(),
            _element: PhantomData,
        }
    }

    /// Set whether null elements are admitted
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.list.allow_empty = allow;
        self
    }

    /// Build from values, failing on the first rejected one
    pub fn from_items(items: impl IntoIterator<Item = T>) -> Result<Self> {
        let mut typed = Self::new();
        typed.list.extend(items)?;
        Ok(typed)
    }

    /// Borrow the element at `index`
    pub fn get(&self, index: usize) -> Option<&T> {
        self.list.get_as::<T>(index)
    }

    /// Iterate elements as `T`, skipping null elements
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.list.iter().filter_map(|v| v.downcast_ref::<T>())
    }

    /// Borrow as an untyped list
    pub fn as_list(&self) -> &List {
        &self.list
    }

    /// Convert into an untyped list, keeping the element type check
    pub fn into_list(self) -> List {
        self.list
    }

    /// Move the elements out as `T`, dropping null elements
    pub fn into_vec(self) -> Vec<T> {
        self.list
            .items
            .into_iter()
            .filter_map(|v| downcast::<T>(v).ok())
            .collect()
    }
}

impl<T: DomainType> Default for TypedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for TypedList<T> {
    type Target = List;

    fn deref(&self) -> &List {
        &self.list
    }
}

impl<T> DerefMut for TypedList<T> {
    fn deref_mut(&mut self) -> &mut List {
        &mut self.list
    }
}

impl<T: DomainType> DomainType for TypedList<T> {
    fn type_info() -> TypeInfo {
        TypeInfo::new(TypeKey::of::<Self>(), TypeKind::List(ListHooks::typed::<T>()))
            .extends(&List::type_info())
    }
}
