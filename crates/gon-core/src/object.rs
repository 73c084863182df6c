//! The parsed object tree.
//!
//! Every [`Object`] carries an optional name, an optional class tag and an
//! attribute map, plus exactly one [`Body`]: nothing, a single scalar, or a
//! list of children. Objects are immutable once built. A nested body is only
//! ever constructed through [`Nested::new`], which rejects duplicate child
//! names, so a half-indexed tree is never observable.

use crate::error::{GonError, Result};
use crate::query::{Combinator, Query};
use crate::value::Value;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// Attribute map of an object. Keys are unique; later writes win.
pub type Attributes = BTreeMap<String, Value>;

/// One node of a GON document.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    name: Option<String>,
    class_tag: Option<String>,
    attributes: Attributes,
    body: Body,
}

/// What an object carries besides its header.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Empty,
    SingleValue(Value),
    Nested(Nested),
}

impl Object {
    /// An object with no body, e.g. `flag;`.
    pub fn empty(name: Option<String>, class_tag: Option<String>, attributes: Attributes) -> Self {
        Self {
            name,
            class_tag,
            attributes,
            body: Body::Empty,
        }
    }

    /// An object with a scalar value, e.g. `size:10;`.
    pub fn single_value(
        name: Option<String>,
        class_tag: Option<String>,
        attributes: Attributes,
        value: Value,
    ) -> Self {
        Self {
            name,
            class_tag,
            attributes,
            body: Body::SingleValue(value),
        }
    }

    /// An object with children, e.g. `root{ a; b; }`.
    ///
    /// Fails with [`GonError::DuplicateChildName`] if two children share a name.
    pub fn nested(
        name: Option<String>,
        class_tag: Option<String>,
        attributes: Attributes,
        children: Vec<Object>,
    ) -> Result<Self> {
        Ok(Self {
            name,
            class_tag,
            attributes,
            body: Body::Nested(Nested::new(children)?),
        })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn class_tag(&self) -> Option<&str> {
        self.class_tag.as_deref()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.body, Body::Empty)
    }

    /// The scalar of a single-valued object.
    pub fn value(&self) -> Option<&Value> {
        match &self.body {
            Body::SingleValue(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_nested(&self) -> Option<&Nested> {
        match &self.body {
            Body::Nested(n) => Some(n),
            _ => None,
        }
    }

    /// Children in document order; empty unless the object is nested.
    pub fn children(&self) -> &[Object] {
        match self.as_nested() {
            Some(nested) => nested.children(),
            None => &[],
        }
    }

    /// Query this object's children, if it has a body.
    pub fn query(&self) -> Option<Query<'_>> {
        self.as_nested().map(Nested::query)
    }

    /// An anonymous, untyped object without a body. Inside a body such an
    /// object only contributes attributes (`key=value;` or `-flag;`).
    pub(crate) fn is_bare_attributes(&self) -> bool {
        self.name.is_none() && self.class_tag.is_none() && self.is_empty()
    }

    pub(crate) fn into_attributes(self) -> Attributes {
        self.attributes
    }
}

/// An ordered child list with a name index built at construction.
#[derive(Debug, Clone)]
pub struct Nested {
    children: Vec<Object>,
    index: HashMap<String, usize>,
}

impl Nested {
    /// Index `children` by name. Anonymous children are not indexed.
    pub fn new(children: Vec<Object>) -> Result<Self> {
        let mut index = HashMap::with_capacity(children.len());
        for (position, child) in children.iter().enumerate() {
            if let Some(name) = child.name() {
                if index.insert(name.to_string(), position).is_some() {
                    return Err(GonError::DuplicateChildName(name.to_string()));
                }
            }
        }
        Ok(Self { children, index })
    }

    pub fn children(&self) -> &[Object] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct lookup by name, without any filtering.
    pub fn get(&self, name: &str) -> Option<&Object> {
        self.index.get(name).map(|&i| &self.children[i])
    }

    /// A query whose clauses are combined with logical AND.
    pub fn query(&self) -> Query<'_> {
        Query::new(&self.children, &self.index)
    }

    /// A query whose clauses are combined with `combinator`.
    pub fn query_with<'a>(&'a self, combinator: Combinator<'a>) -> Query<'a> {
        Query::with_combinator(&self.children, &self.index, combinator)
    }
}

impl PartialEq for Nested {
    fn eq(&self, other: &Self) -> bool {
        // The index is derived from the children.
        self.children == other.children
    }
}

impl Serialize for Object {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(name) = &self.name {
            map.serialize_entry("name", name)?;
        }
        if let Some(class_tag) = &self.class_tag {
            map.serialize_entry("class", class_tag)?;
        }
        if !self.attributes.is_empty() {
            map.serialize_entry("attributes", &self.attributes)?;
        }
        match &self.body {
            Body::Empty => {}
            Body::SingleValue(value) => map.serialize_entry("value", value)?,
            Body::Nested(nested) => map.serialize_entry("children", &nested.children)?,
        }
        map.end()
    }
}
