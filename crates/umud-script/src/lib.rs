//! umud script - RON rule sets
//!
//! Loads the lists a game's rules are made of and turns them into the
//! configuration objects `umud-core` constructors take:
//! - status kinds -> [`umud_core::SchedulerConfig`]
//! - tables and bodies -> [`umud_core::ListElementSpec`], [`umud_core::Body`]
//! - entity types -> [`umud_core::EntityTemplate`]
//! - skills with learning and completion difficulty

mod error;
mod loader;
mod schema;

pub use error::{Error, Result};
pub use loader::{Loader, RuleSet, STANDARD_RULES};
pub use schema::body::BodyDef;
pub use schema::entity::{BodyRef, EntityTypeDef};
pub use schema::skill::{Difficulty, SkillDef};
pub use schema::table::TableDef;
