//! The contract for actions that take time
//!
//! The command layer owns its actions as [`ActionRef`]s. The scheduler
//! only keeps a `Weak` to the armed one, so dropping the last `Rc`
//! abandons the action and completion becomes a no-op.

use crate::{EntityId, Scheduler, StatusKind, World};
use std::fmt;
use std::rc::Rc;

/// Shared handle to an action
pub type ActionRef = Rc<dyn DeferredAction>;

/// Everything an action hook may touch
///
/// The scheduler is handed in mutably so a hook can arm, stop or complete
/// statuses, including its own, while the scheduler is resolving it.
pub struct ActionContext<'a> {
    pub world: &'a mut World,
    pub scheduler: &'a mut Scheduler,
}

impl ActionContext<'_> {
    pub fn now(&self) -> f64 {
        self.world.now()
    }

    pub fn msg(&mut self, to: EntityId, text: impl Into<String>) {
        self.world.msg(to, text);
    }
}

pub trait DeferredAction {
    /// Short verb used in notices ("wear", "punch")
    fn name(&self) -> &str;

    fn actor(&self) -> EntityId;

    fn target(&self) -> Option<EntityId> {
        None
    }

    /// Seconds between arming and completion
    fn delay(&self) -> f64;

    fn status_kind(&self) -> StatusKind {
        StatusKind::busy()
    }

    /// Runs right after the action is armed
    fn on_armed(&self, _ctx: &mut ActionContext<'_>) {}

    /// Runs at most once per arm; returns whether the effect happened
    fn on_complete(&self, ctx: &mut ActionContext<'_>) -> bool;
}

type CompleteFn = dyn Fn(&TimedAction, &mut ActionContext<'_>) -> bool;

/// A [`DeferredAction`] assembled from parts
///
/// ```ignore
/// let wear = TimedAction::new("wear", char1, 3.0)
///     .armed_text("You begin putting on the test hat.")
///     .completes_with(|action, ctx| {
///         ctx.msg(action.actor(), "You put on the test hat.");
///         true
///     })
///     .into_ref();
/// ```
pub struct TimedAction {
    name: String,
    actor: EntityId,
    target: Option<EntityId>,
    delay: f64,
    kind: StatusKind,
    armed_text: Option<String>,
    complete: Option<Box<CompleteFn>>,
}

impl TimedAction {
    pub fn new(name: impl Into<String>, actor: EntityId, delay: f64) -> Self {
        Self {
            name: name.into(),
            actor,
            target: None,
            delay,
            kind: StatusKind::busy(),
            armed_text: None,
            complete: None,
        }
    }

    pub fn with_target(mut self, target: EntityId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_kind(mut self, kind: StatusKind) -> Self {
        self.kind = kind;
        self
    }

    /// Notice sent to the actor once armed
    pub fn armed_text(mut self, text: impl Into<String>) -> Self {
        self.armed_text = Some(text.into());
        self
    }

    pub fn completes_with(
        mut self,
        complete: impl Fn(&TimedAction, &mut ActionContext<'_>) -> bool + 'static,
    ) -> Self {
        self.complete = Some(Box::new(complete));
        self
    }

    pub fn into_ref(self) -> ActionRef {
        Rc::new(self)
    }
}

impl DeferredAction for TimedAction {
    fn name(&self) -> &str {
        &self.name
    }

    fn actor(&self) -> EntityId {
        self.actor
    }

    fn target(&self) -> Option<EntityId> {
        self.target
    }

    fn delay(&self) -> f64 {
        self.delay
    }

    fn status_kind(&self) -> StatusKind {
        self.kind.clone()
    }

    fn on_armed(&self, ctx: &mut ActionContext<'_>) {
        if let Some(text) = &self.armed_text {
            ctx.msg(self.actor, text.clone());
        }
    }

    fn on_complete(&self, ctx: &mut ActionContext<'_>) -> bool {
        match &self.complete {
            Some(complete) => complete(self, ctx),
            None => true,
        }
    }
}

impl fmt::Debug for TimedAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimedAction")
            .field("name", &self.name)
            .field("actor", &self.actor)
            .field("target", &self.target)
            .field("delay", &self.delay)
            .field("kind", &self.kind)
            .finish()
    }
}
