//! Entity type definitions

use umud_core::{DefId, ElementSpec};
use serde::{Deserialize, Serialize};

/// Definition of an entity type (character, object, exit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeDef {
    pub id: DefId,
    pub name: String,
    /// Cells with non-standard defaults; others are created on first use
    #[serde(default)]
    pub elements: Vec<ElementSpec>,
    /// Ids of table definitions attached to the entity itself
    #[serde(default)]
    pub tables: Vec<DefId>,
    #[serde(default)]
    pub body: Option<BodyRef>,
    /// Wire `hp` to the `conditions` table
    #[serde(default)]
    pub vitals: bool,
}

/// Which layout a body uses and which tables its parts carry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyRef {
    pub layout: DefId,
    pub status: DefId,
    pub armor: DefId,
}
