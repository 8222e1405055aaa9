//! Keyed attribute tables
//!
//! A [`ListElement`] is a fixed, ordered set of keys over some attribute
//! store. Keys are stored as `{table}_{key}` and only while they hold a
//! non-default value. Unlike cells, tables never run callbacks.

use crate::attributes::{AttributeStore, PrefixedStore};
use crate::{Error, Result, Value};
use serde::{Deserialize, Serialize};

/// Name, key set and default value of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListElementSpec {
    pub name: String,
    pub keys: Vec<String>,
    #[serde(default = "default_entry")]
    pub default: Value,
}

fn default_entry() -> Value {
    Value::Int(0)
}

impl ListElementSpec {
    /// Table over `keys` where absent entries read as `default`
    pub fn new<K>(name: impl Into<String>, keys: K, default: Value) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self {
            name: name.into(),
            keys: keys.into_iter().map(Into::into).collect(),
            default,
        }
    }

    /// Table of numeric counters defaulting to 0
    pub fn counters<K>(name: impl Into<String>, keys: K) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self::new(name, keys, Value::Int(0))
    }

    /// Table of flags defaulting to false
    pub fn flags<K>(name: impl Into<String>, keys: K) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
    {
        Self::new(name, keys, Value::Bool(false))
    }

    /// Same keys and default under another name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: self.keys.clone(),
            default: self.default.clone(),
        }
    }

    /// Whether `key` is one of the configured keys
    pub fn contains(&self, key: &str) -> bool {
        self.keys.iter().any(|k| k == key)
    }
}

/// One table key together with where it lives in storage
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub key: String,
    pub storage_key: String,
    pub value: Value,
    pub persisted: bool,
}

/// Live handle to a table
pub struct ListElement<'a> {
    spec: ListElementSpec,
    store: PrefixedStore<'a>,
}

impl<'a> ListElement<'a> {
    /// Attach a table to a store; keys are namespaced by the table name
    pub fn attach(store: &'a mut dyn AttributeStore, spec: ListElementSpec) -> Self {
        let store = PrefixedStore::new(store, spec.name.clone());
        Self { spec, store }
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn keys(&self) -> &[String] {
        &self.spec.keys
    }

    /// Value an unset key reads as
    pub fn default_value(&self) -> &Value {
        &self.spec.default
    }

    pub fn contains(&self, key: &str) -> bool {
        self.spec.contains(key)
    }

    fn check(&self, key: &str) -> Result<()> {
        if self.spec.contains(key) {
            Ok(())
        } else {
            Err(Error::unknown_key(&self.spec.name, key))
        }
    }

    /// Stored value, or the table default
    pub fn get(&self, key: &str) -> Result<Value> {
        self.get_or(key, self.spec.default.clone())
    }

    /// Stored value, or `default`
    pub fn get_or(&self, key: &str, default: Value) -> Result<Value> {
        self.check(key)?;
        Ok(self.store.get_or(key, default))
    }

    /// Numeric view of a key, for damage-reduction style lookups
    pub fn number(&self, key: &str) -> Result<f64> {
        Ok(self.get(key)?.as_number().unwrap_or(0.0))
    }

    /// Truthiness of a key, for flag tables
    pub fn flag(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_truthy())
    }

    /// Write a key; the default value removes the stored entry
    pub fn set_key(&mut self, key: &str, value: impl Into<Value>) -> Result<()> {
        self.check(key)?;
        let value = value.into();
        if !value.is_numeric() {
            return Err(Error::invalid_value(
                format!("{}.{}", self.spec.name, key),
                value.type_name(),
            ));
        }
        if value.same_as(&self.spec.default) {
            self.store.remove(key);
        } else {
            self.store.add(key, value);
        }
        Ok(())
    }

    /// Dynamic form of [`ListElement::set_key`]
    pub fn set_value(&mut self, key: &str, value: &Value) -> Result<()> {
        self.set_key(key, value.clone())
    }

    /// Every configured key in declared order
    pub fn items(&self) -> Vec<(String, Value)> {
        self.spec
            .keys
            .iter()
            .map(|key| (key.clone(), self.store.get_or(key, self.spec.default.clone())))
            .collect()
    }

    /// Every configured key with its storage metadata
    pub fn entries(&self) -> Vec<ListEntry> {
        self.spec
            .keys
            .iter()
            .map(|key| {
                let stored = self.store.get(key).cloned();
                ListEntry {
                    key: key.clone(),
                    storage_key: format!("{}_{}", self.store.prefix(), key),
                    persisted: stored.is_some(),
                    value: stored.unwrap_or_else(|| self.spec.default.clone()),
                }
            })
            .collect()
    }

    /// Only the entries that differ from the default
    pub fn iter(&self) -> std::vec::IntoIter<(String, Value)> {
        self.spec
            .keys
            .iter()
            .filter_map(|key| {
                self.store
                    .get(key)
                    .filter(|value| !value.same_as(&self.spec.default))
                    .map(|value| (key.clone(), value.clone()))
            })
            .collect::<Vec<_>>()
            .into_iter()
    }

    /// Number of non-default entries
    pub fn count_set(&self) -> usize {
        self.iter().count()
    }

    /// Reset every key to the default
    pub fn delete(&mut self) {
        for key in &self.spec.keys {
            self.store.remove(key);
        }
    }
}
