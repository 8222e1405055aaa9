//! umud core - bounded attribute cells and deferred-action scheduling
//!
//! Two halves that lean on each other:
//! - Attribute model: [`Element`] cells (clamped numbers with breakpoint
//!   and boundary callbacks) and [`ListElement`] tables (sparse keyed
//!   values), both stored on an [`Entity`]'s attributes
//! - Status scheduling: a [`Scheduler`] that arms, expires, interrupts and
//!   completes [`DeferredAction`]s per actor, driven by a [`Clock`]
//!
//! Side effects meant for players leave through the [`World`] outbox as
//! [`Cmd`] values for the host to deliver.

mod action;
mod attributes;
mod body;
mod cmd;
pub mod config;
pub mod element;
mod entity;
mod error;
mod identity;
mod list_element;
mod rng;
pub mod status;
pub mod time;
mod timer;
mod value;
mod world;

pub use action::{ActionContext, ActionRef, DeferredAction, TimedAction};
pub use attributes::{AttributeStore, Attributes, PrefixedStore};
pub use body::{Body, BodyLayout};
pub use cmd::Cmd;
pub use config::{EntityTemplate, SchedulerConfig, StatusKind, StatusKindConfig};
pub use element::{Element, ElementHooks, ElementSpec};
pub use entity::{Entity, EntityStore};
pub use error::{Error, Result};
pub use identity::{DefId, EntityId};
pub use list_element::{ListElement, ListElementSpec, ListEntry};
pub use rng::GameRng;
pub use status::{PromptReply, Scheduler, StatusRecord, StatusSnapshot, StopRequest};
pub use time::{Clock, ManualClock, SystemClock};
pub use timer::{TimerEvent, TimerHandle, TimerQueue};
pub use value::Value;
pub use world::World;
