//! Method listers: where class and method documentation comes from.

pub mod source;

pub use source::SourceLister;

use crate::error::{Error, Result};
use std::collections::HashMap;

/// A public method and its raw documentation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDoc {
    pub name: String,
    /// Raw comment text including delimiters; empty when undocumented
    pub comment: String,
}

impl MethodDoc {
    pub fn new(name: impl Into<String>, comment: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: comment.into(),
        }
    }
}

/// Lists the public methods of a class by name.
pub trait MethodLister {
    /// Public methods in declaration order.
    ///
    /// Fails with [`Error::ClassNotFound`] when the class is unknown.
    fn list_public_methods(&self, class: &str) -> Result<Vec<MethodDoc>>;
}

impl<T: MethodLister + ?Sized> MethodLister for &T {
    fn list_public_methods(&self, class: &str) -> Result<Vec<MethodDoc>> {
        (**self).list_public_methods(class)
    }
}

impl<T: MethodLister + ?Sized> MethodLister for Box<T> {
    fn list_public_methods(&self, class: &str) -> Result<Vec<MethodDoc>> {
        (**self).list_public_methods(class)
    }
}

/// In-memory class registry.
#[derive(Debug, Default, Clone)]
pub struct StaticLister {
    classes: HashMap<String, Vec<MethodDoc>>,
}

impl StaticLister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a class with `(method, comment)` pairs.
    pub fn with_class<I, N, C>(mut self, class: &str, methods: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        self.insert(class, methods);
        self
    }

    pub fn insert<I, N, C>(&mut self, class: &str, methods: I)
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let methods = methods
            .into_iter()
            .map(|(name, comment)| MethodDoc::new(name, comment))
            .collect();
        self.classes.insert(class.to_string(), methods);
    }
}

impl MethodLister for StaticLister {
    fn list_public_methods(&self, class: &str) -> Result<Vec<MethodDoc>> {
        self.classes
            .get(class)
            .cloned()
            .ok_or_else(|| Error::ClassNotFound(class.to_string()))
    }
}
