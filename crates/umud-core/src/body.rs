//! Composite bodies made of named parts
//!
//! Each part exposes two tables: its status flags, stored durably as
//! `{part}_{status}`, and a cached damage-reduction table kept in the
//! ephemeral store as `{part}_dr_{type}`. The cache is rebuilt from worn
//! equipment and never saved.

use crate::{GameRng, ListElementSpec};
use serde::{Deserialize, Serialize};

/// Ordered list of part names for one kind of creature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyLayout {
    pub name: String,
    pub parts: Vec<String>,
}

impl BodyLayout {
    pub fn new<P>(name: impl Into<String>, parts: P) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            name: name.into(),
            parts: parts.into_iter().map(Into::into).collect(),
        }
    }
}

/// A body attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    layout: BodyLayout,
    status: ListElementSpec,
    armor: ListElementSpec,
}

impl Body {
    /// `status` and `armor` supply the key sets; their names are replaced
    /// per part.
    pub fn new(layout: BodyLayout, status: ListElementSpec, armor: ListElementSpec) -> Self {
        Self {
            layout,
            status,
            armor,
        }
    }

    pub fn layout(&self) -> &BodyLayout {
        &self.layout
    }

    pub fn parts(&self) -> &[String] {
        &self.layout.parts
    }

    pub fn has_part(&self, part: &str) -> bool {
        self.layout.parts.iter().any(|p| p == part)
    }

    /// Table spec for a part's status flags
    pub fn status_spec(&self, part: &str) -> ListElementSpec {
        self.status.renamed(part)
    }

    /// Table spec for a part's cached damage reduction
    pub fn armor_spec(&self, part: &str) -> ListElementSpec {
        self.armor.renamed(format!("{}_dr", part))
    }

    /// Pick a part uniformly at random
    pub fn random_part(&self, rng: &mut GameRng) -> Option<&str> {
        rng.pick(&self.layout.parts).map(String::as_str)
    }
}
