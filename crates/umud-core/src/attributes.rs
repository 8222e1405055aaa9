//! Key/value attribute storage
//!
//! Every entity carries two stores: a durable one that is part of its
//! serialized state, and an ephemeral one that is skipped on save. Cells
//! and tables only ever see the [`AttributeStore`] trait, so a nested part
//! can hand them a [`PrefixedStore`] view instead of owning storage.

use crate::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Minimal persistence contract used by cells and tables
pub trait AttributeStore {
    fn has(&self, key: &str) -> bool;

    fn get(&self, key: &str) -> Option<&Value>;

    fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).cloned().unwrap_or(default)
    }

    fn add(&mut self, key: &str, value: Value);

    fn remove(&mut self, key: &str) -> Option<Value>;

    /// All stored keys, in insertion order
    fn keys(&self) -> Vec<String>;
}

/// Insertion-ordered attribute map
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    values: IndexMap<String, Value>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl AttributeStore for Attributes {
    fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    fn add(&mut self, key: &str, value: Value) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.shift_remove(key)
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}

/// A view over another store that namespaces every key as `{prefix}_{key}`
pub struct PrefixedStore<'a> {
    inner: &'a mut dyn AttributeStore,
    prefix: String,
}

impl<'a> PrefixedStore<'a> {
    pub fn new(inner: &'a mut dyn AttributeStore, prefix: impl Into<String>) -> Self {
        Self {
            inner,
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key)
    }
}

impl AttributeStore for PrefixedStore<'_> {
    fn has(&self, key: &str) -> bool {
        self.inner.has(&self.full_key(key))
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.inner.get(&self.full_key(key))
    }

    fn add(&mut self, key: &str, value: Value) {
        let key = self.full_key(key);
        self.inner.add(&key, value);
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        let key = self.full_key(key);
        self.inner.remove(&key)
    }

    fn keys(&self) -> Vec<String> {
        let head = format!("{}_", self.prefix);
        self.inner
            .keys()
            .into_iter()
            .filter_map(|k| k.strip_prefix(&head).map(str::to_string))
            .collect()
    }
}
