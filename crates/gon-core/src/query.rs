//! Chainable filters over the children of a nested object.
//!
//! A [`Query`] starts from a predicate that accepts every child and folds each
//! new clause into it with its [`Combinator`] (logical AND unless another one
//! is supplied). The fold always starts from "accept", so under [`or`] every
//! child passes.
//!
//! ```
//! use gon_core::parse;
//!
//! let root = parse("root{ a[Item] -on; b[Item]; c; }").unwrap();
//! let items = root.query().unwrap().with_class("Item").with_attribute("on");
//! assert_eq!(items.all().len(), 1);
//! assert_eq!(items.first().and_then(|o| o.name()), Some("a"));
//! ```

use crate::error::Result;
use crate::object::Object;
use crate::value::Value;
use regex::Regex;
use std::collections::HashMap;

/// A test over a single child.
pub type Predicate<'a> = Box<dyn Fn(&Object) -> bool + 'a>;

/// Folds the accumulated predicate and a new clause into one predicate.
pub type Combinator<'a> = Box<dyn Fn(Predicate<'a>, Predicate<'a>) -> Predicate<'a> + 'a>;

/// Both predicates must hold.
pub fn and<'a>() -> Combinator<'a> {
    Box::new(|lhs: Predicate<'a>, rhs: Predicate<'a>| -> Predicate<'a> {
        Box::new(move |obj: &Object| lhs(obj) && rhs(obj))
    })
}

/// Either predicate may hold.
pub fn or<'a>() -> Combinator<'a> {
    Box::new(|lhs: Predicate<'a>, rhs: Predicate<'a>| -> Predicate<'a> {
        Box::new(move |obj: &Object| lhs(obj) || rhs(obj))
    })
}

fn accept_all<'a>() -> Predicate<'a> {
    Box::new(|_: &Object| true)
}

/// A filter over a borrowed child list and its name index.
pub struct Query<'a> {
    children: &'a [Object],
    index: &'a HashMap<String, usize>,
    combinator: Combinator<'a>,
    predicate: Predicate<'a>,
}

impl<'a> Query<'a> {
    pub(crate) fn new(children: &'a [Object], index: &'a HashMap<String, usize>) -> Self {
        Self::with_combinator(children, index, and())
    }

    pub(crate) fn with_combinator(
        children: &'a [Object],
        index: &'a HashMap<String, usize>,
        combinator: Combinator<'a>,
    ) -> Self {
        Self {
            children,
            index,
            combinator,
            predicate: accept_all(),
        }
    }

    /// Add an arbitrary clause.
    pub fn with(mut self, clause: impl Fn(&Object) -> bool + 'a) -> Self {
        let acc = std::mem::replace(&mut self.predicate, accept_all());
        self.predicate = (self.combinator)(acc, Box::new(clause));
        self
    }

    /// Children whose whole name matches `pattern`. Unnamed children never match.
    pub fn match_key(self, pattern: &str) -> Result<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(self.with(move |obj| obj.name().is_some_and(|name| regex.is_match(name))))
    }

    /// Children that carry attribute `key`.
    pub fn with_attribute(self, key: &str) -> Self {
        let key = key.to_string();
        self.with(move |obj| obj.attributes().contains_key(&key))
    }

    /// Children whose attribute `key` equals `value`.
    pub fn with_attribute_value(self, key: &str, value: Value) -> Self {
        self.with_attribute_matching(key, move |attr| attr == Some(&value))
    }

    /// Children whose attribute `key` satisfies `test`. `test` receives
    /// `None` when the attribute is absent.
    pub fn with_attribute_matching(
        self,
        key: &str,
        test: impl Fn(Option<&Value>) -> bool + 'a,
    ) -> Self {
        let key = key.to_string();
        self.with(move |obj| test(obj.attribute(&key)))
    }

    /// Children with class tag `tag`.
    pub fn with_class(self, tag: &str) -> Self {
        let tag = tag.to_string();
        self.with(move |obj| obj.class_tag() == Some(tag.as_str()))
    }

    fn accepts(&self, obj: &Object) -> bool {
        (self.predicate)(obj)
    }

    /// The child named `name`, if it passes the filter.
    pub fn by_key(&self, name: &str) -> Option<&'a Object> {
        let children = self.children;
        self.index
            .get(name)
            .map(|&i| &children[i])
            .filter(|obj| self.accepts(obj))
    }

    /// Every passing child, in document order.
    pub fn all(&self) -> Vec<&'a Object> {
        self.children.iter().filter(|obj| self.accepts(obj)).collect()
    }

    /// The first passing child in document order.
    pub fn first(&self) -> Option<&'a Object> {
        self.children.iter().find(|obj| self.accepts(obj))
    }

    /// The child at `position`, only if it passes the filter.
    pub fn at_position(&self, position: usize) -> Option<&'a Object> {
        self.children.get(position).filter(|obj| self.accepts(obj))
    }
}
