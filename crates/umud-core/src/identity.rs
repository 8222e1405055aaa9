//! Names for things in the world and in the rules
//!
//! Entities are numbered by their store. Rule-set names (damage types,
//! status kinds, body layouts) are plain strings wrapped so they can't be
//! confused with player-facing text.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// A character or object, numbered in creation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl EntityId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Number assigned by the entity store
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Log and error form, e.g. `entity:3`
impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity:{}", self.0)
    }
}

/// A rule-set name such as `BLG`, `busy` or `humanoid`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefId(pub String);

impl DefId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Blank names are rejected when rules are loaded
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for DefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DefId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for DefId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for DefId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lets maps keyed by `DefId` be queried with a `&str`
impl Borrow<str> for DefId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for DefId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}
