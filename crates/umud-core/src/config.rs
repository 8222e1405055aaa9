//! Rule-set configuration passed into constructors
//!
//! - [`StatusKind`] / [`StatusKindConfig`] / [`SchedulerConfig`]: which
//!   statuses exist and how they behave
//! - [`EntityTemplate`]: cells, tables and body an entity starts with
//! - the standard name lists used by [`EntityTemplate::character`]

use crate::{Body, BodyLayout, DefId, ElementSpec, Entity, ListElementSpec};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DAMAGE_TYPES: [&str; 10] = [
    "ACD", "BLG", "CLD", "FIR", "ELC", "MNT", "PRC", "POI", "RAD", "SLS",
];

pub const PART_STATUS: [&str; 5] = ["broke", "bleeding", "missing", "occupied", "wielding"];

pub const CHARACTER_CONDITIONS: [&str; 5] = ["unconscious", "dead", "poisoned", "sick", "learning"];

pub const HUMANOID_BODY: [&str; 13] = [
    "head",
    "shoulders",
    "chest",
    "waist",
    "back",
    "right_arm",
    "left_arm",
    "right_hand",
    "left_hand",
    "right_leg",
    "left_leg",
    "right_foot",
    "left_foot",
];

/// Name of a status an actor can be in
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusKind(DefId);

impl StatusKind {
    pub fn new(name: impl Into<DefId>) -> Self {
        Self(name.into())
    }

    pub fn busy() -> Self {
        Self::new("busy")
    }

    pub fn stunned() -> Self {
        Self::new("stunned")
    }

    pub fn learning() -> Self {
        Self::new("learning")
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for StatusKind {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Behaviour of one status kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusKindConfig {
    pub name: StatusKind,
    /// An active record makes `is_ready` fail
    #[serde(default = "yes")]
    pub gates_readiness: bool,
    /// Armed records keep a reference to the pending action
    #[serde(default = "yes")]
    pub carries_action: bool,
    /// Records are included in scheduler snapshots
    #[serde(default)]
    pub durable: bool,
}

fn yes() -> bool {
    true
}

impl StatusKindConfig {
    pub fn new(name: impl Into<StatusKind>) -> Self {
        Self {
            name: name.into(),
            gates_readiness: true,
            carries_action: true,
            durable: false,
        }
    }

    pub fn gates_readiness(mut self, gates: bool) -> Self {
        self.gates_readiness = gates;
        self
    }

    pub fn carries_action(mut self, carries: bool) -> Self {
        self.carries_action = carries;
        self
    }

    pub fn durable(mut self, durable: bool) -> Self {
        self.durable = durable;
        self
    }
}

/// Status kinds known to a scheduler, in readiness-check order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub kinds: Vec<StatusKindConfig>,
}

impl SchedulerConfig {
    pub fn new(kinds: Vec<StatusKindConfig>) -> Self {
        Self { kinds }
    }

    /// `busy`, `stunned` and `learning`
    pub fn standard() -> Self {
        Self::new(vec![
            StatusKindConfig::new(StatusKind::busy()),
            StatusKindConfig::new(StatusKind::stunned())
                .carries_action(false)
                .durable(true),
            StatusKindConfig::new(StatusKind::learning()).gates_readiness(false),
        ])
    }

    pub fn kind(&self, kind: &StatusKind) -> Option<&StatusKindConfig> {
        self.kinds.iter().find(|k| &k.name == kind)
    }

    pub fn gating(&self) -> impl Iterator<Item = &StatusKind> {
        self.kinds
            .iter()
            .filter(|k| k.gates_readiness)
            .map(|k| &k.name)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::standard()
    }
}

/// Everything a freshly created entity is given
#[derive(Debug, Clone, Default)]
pub struct EntityTemplate {
    pub elements: Vec<ElementSpec>,
    pub tables: Vec<ListElementSpec>,
    pub body: Option<Body>,
    /// Wire `hp` breakpoint and minimum to the `conditions` table
    pub vitals: bool,
}

impl EntityTemplate {
    /// A humanoid character with `hp`, `dr`, `conditions` and vital hooks
    pub fn character() -> Self {
        Self {
            elements: vec![ElementSpec::new("hp")],
            tables: vec![
                ListElementSpec::counters("dr", DAMAGE_TYPES),
                ListElementSpec::flags("conditions", CHARACTER_CONDITIONS),
            ],
            body: Some(Body::new(
                BodyLayout::new("humanoid", HUMANOID_BODY),
                ListElementSpec::flags("part", PART_STATUS),
                ListElementSpec::counters("dr", DAMAGE_TYPES),
            )),
            vitals: true,
        }
    }

    /// A plain object with `hp` and `dr` only
    pub fn object() -> Self {
        Self {
            elements: vec![ElementSpec::new("hp")],
            tables: vec![ListElementSpec::counters("dr", DAMAGE_TYPES)],
            body: None,
            vitals: false,
        }
    }

    pub fn apply(&self, entity: &mut Entity) {
        for spec in &self.elements {
            entity.declare_element(spec.clone());
        }
        for spec in &self.tables {
            entity.declare_table(spec.clone());
        }
        if let Some(body) = &self.body {
            entity.set_body(body.clone());
        }
        if self.vitals {
            entity.install_vital_hooks();
        }
    }
}
