//! Per-actor status records and their timers
//!
//! An actor holds at most one record per status kind. A record bundles the
//! deadline, the timer that will resolve it and, for kinds that carry one,
//! a weak reference to the pending action. The three are created in
//! [`Scheduler::arm`] and dropped together in [`Scheduler::resolve`].
//!
//! Deadlines are absolute. [`Scheduler::remaining`] recomputes from the
//! clock on every call, and a record whose deadline has passed is resolved
//! on the spot even if its timer has not been drained yet.

mod interrupt;
mod snapshot;

pub use interrupt::{PromptReply, StopRequest};
pub use snapshot::StatusSnapshot;

use crate::{
    ActionContext, ActionRef, DeferredAction, EntityId, SchedulerConfig, StatusKind,
    TimerEvent, TimerHandle, TimerQueue, World,
};
use indexmap::IndexMap;
use std::rc::{Rc, Weak};

/// One armed status
#[derive(Debug, Clone)]
pub struct StatusRecord {
    pub started: f64,
    pub deadline: f64,
    action: Option<Weak<dyn DeferredAction>>,
    action_name: Option<String>,
    timer: TimerHandle,
}

impl StatusRecord {
    pub fn action_name(&self) -> Option<&str> {
        self.action_name.as_deref()
    }

    pub fn timer(&self) -> TimerHandle {
        self.timer
    }
}

/// "You will be busy for 3 seconds."
pub fn duration_notice(kind: &StatusKind, seconds: f64) -> String {
    let whole = seconds.round().max(1.0) as u64;
    let plural = if whole > 1 { "s" } else { "" };
    format!("You will be {} for {} second{}.", kind, whole, plural)
}

/// "You are no longer busy."
pub fn ended_notice(kind: &StatusKind) -> String {
    format!("You are no longer {}.", kind)
}

#[derive(Debug, Default)]
pub struct Scheduler {
    config: SchedulerConfig,
    records: IndexMap<(EntityId, StatusKind), StatusRecord>,
    prompts: IndexMap<EntityId, StopRequest>,
    timers: TimerQueue,
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            records: IndexMap::new(),
            prompts: IndexMap::new(),
            timers: TimerQueue::new(),
        }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Start a status on `actor`. Returns false if the actor already has
    /// one of that kind, the kind is unknown, or the actor does not exist.
    pub fn arm(
        &mut self,
        world: &mut World,
        actor: EntityId,
        action: Option<&ActionRef>,
        delay: f64,
        kind: &StatusKind,
    ) -> bool {
        let Some(config) = self.config.kind(kind).cloned() else {
            tracing::warn!(%actor, %kind, "arm with unknown status kind");
            return false;
        };
        if !world.entities.contains(actor) {
            tracing::warn!(%actor, %kind, "arm for missing entity");
            return false;
        }
        if !delay.is_finite() || delay < 0.0 {
            tracing::warn!(%actor, %kind, delay, "arm with invalid delay");
            return false;
        }
        // an overdue completion run by `remaining` may have armed a new record
        if self.remaining(world, actor, kind) > 0.0 || self.is_active(actor, kind) {
            tracing::debug!(%actor, %kind, "already active, arm rejected");
            return false;
        }

        let action = if config.carries_action { action } else { None };
        let now = world.now();
        let timer = self.timers.delay(
            now,
            delay,
            TimerEvent::StatusExpired {
                actor,
                kind: kind.clone(),
            },
            config.durable,
        );
        self.records.insert(
            (actor, kind.clone()),
            StatusRecord {
                started: now,
                deadline: now + delay,
                action: action.map(Rc::downgrade),
                action_name: action.map(|a| a.name().to_string()),
                timer,
            },
        );
        tracing::debug!(%actor, %kind, delay, action = ?action.map(|a| a.name()), "armed");

        world.msg(actor, duration_notice(kind, delay));
        if let Some(action) = action {
            let mut ctx = ActionContext {
                world,
                scheduler: self,
            };
            action.on_armed(&mut ctx);
        }
        true
    }

    /// Readiness gate plus `arm` with the action's own delay and kind
    pub fn defer(&mut self, world: &mut World, action: &ActionRef) -> bool {
        let actor = action.actor();
        if !self.is_ready(world, actor) {
            return false;
        }
        let kind = action.status_kind();
        self.arm(world, actor, Some(action), action.delay(), &kind)
    }

    /// Seconds left on a status, 0 when there is none
    ///
    /// A record past its deadline is resolved here, completion included,
    /// as if its timer had fired on time. If that completion arms the same
    /// kind again, the new record's time is returned.
    pub fn remaining(&mut self, world: &mut World, actor: EntityId, kind: &StatusKind) -> f64 {
        let Some(deadline) = self.deadline(actor, kind) else {
            return 0.0;
        };
        let left = deadline - world.now();
        if left > 0.0 {
            return left;
        }
        tracing::debug!(%actor, %kind, overdue = -left, "resolving overdue status");
        self.resolve(world, actor, kind, true);
        self.deadline(actor, kind)
            .map_or(0.0, |deadline| (deadline - world.now()).max(0.0))
    }

    /// Admission check run before any state-changing action
    pub fn is_ready(&mut self, world: &mut World, actor: EntityId) -> bool {
        let gating: Vec<StatusKind> = self.config.gating().cloned().collect();
        for kind in gating {
            let left = self.remaining(world, actor, &kind);
            if left > 0.0 {
                world.msg(actor, duration_notice(&kind, left));
                return false;
            }
        }
        true
    }

    /// End a status. Returns false if there was nothing to end.
    ///
    /// The record is removed and the ended notice sent before the
    /// completion routine runs, so a routine that stops or re-arms its own
    /// actor sees it idle, and a second resolve finds nothing.
    pub fn resolve(
        &mut self,
        world: &mut World,
        actor: EntityId,
        kind: &StatusKind,
        run_completion: bool,
    ) -> bool {
        let Some(record) = self.records.shift_remove(&(actor, kind.clone())) else {
            tracing::debug!(%actor, %kind, "nothing to resolve");
            return false;
        };
        self.timers.cancel(record.timer);
        if self
            .prompts
            .get(&actor)
            .is_some_and(|prompt| &prompt.kind == kind)
        {
            self.prompts.shift_remove(&actor);
        }
        world.msg(actor, ended_notice(kind));

        if run_completion {
            if let Some(weak) = &record.action {
                match weak.upgrade() {
                    Some(action) => {
                        let mut ctx = ActionContext {
                            world: &mut *world,
                            scheduler: &mut *self,
                        };
                        let done = action.on_complete(&mut ctx);
                        tracing::debug!(%actor, %kind, action = action.name(), done, "completed");
                    }
                    None => tracing::warn!(
                        %actor,
                        %kind,
                        action = ?record.action_name,
                        "pending action dropped before completion"
                    ),
                }
            }
        }
        true
    }

    /// Resolve every record whose timer is due
    pub fn advance(&mut self, world: &mut World) -> usize {
        let now = world.now();
        let mut fired = 0;
        for (handle, event) in self.timers.pop_due(now) {
            match event {
                TimerEvent::StatusExpired { actor, kind } => {
                    let current = self.records.get(&(actor, kind.clone())).map(|r| r.timer);
                    if current != Some(handle) {
                        tracing::debug!(%actor, %kind, "timer outlived its record");
                        continue;
                    }
                    if self.resolve(world, actor, &kind, true) {
                        fired += 1;
                    }
                }
            }
        }
        fired
    }

    /// Whether a record exists, without checking its deadline
    pub fn is_active(&self, actor: EntityId, kind: &StatusKind) -> bool {
        self.records.contains_key(&(actor, kind.clone()))
    }

    pub fn record(&self, actor: EntityId, kind: &StatusKind) -> Option<&StatusRecord> {
        self.records.get(&(actor, kind.clone()))
    }

    pub fn deadline(&self, actor: EntityId, kind: &StatusKind) -> Option<f64> {
        self.record(actor, kind).map(|r| r.deadline)
    }

    /// The armed action, if it is still alive
    pub fn pending_action(&self, actor: EntityId, kind: &StatusKind) -> Option<ActionRef> {
        self.record(actor, kind)
            .and_then(|r| r.action.as_ref())
            .and_then(Weak::upgrade)
    }

    /// Number of live records across all actors
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn action_label(&self, actor: EntityId, kind: &StatusKind) -> String {
        self.record(actor, kind)
            .and_then(|r| r.action_name.clone())
            .unwrap_or_else(|| kind.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EntityTemplate, ManualClock, TimedAction};
    use std::cell::Cell;

    fn setup() -> (World, ManualClock, Scheduler, EntityId) {
        let clock = ManualClock::new(1000.0);
        let mut world = World::new(clock.clone());
        let actor = world.spawn("Char", "character", &EntityTemplate::character());
        (world, clock, Scheduler::new(SchedulerConfig::standard()), actor)
    }

    fn counted(actor: EntityId, delay: f64) -> (ActionRef, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        let action = TimedAction::new("wear", actor, delay)
            .completes_with(move |_, _| {
                inner.set(inner.get() + 1);
                true
            })
            .into_ref();
        (action, count)
    }

    #[test]
    fn test_duration_notice() {
        assert_eq!(duration_notice(&StatusKind::busy(), 3.0), "You will be busy for 3 seconds.");
        assert_eq!(duration_notice(&StatusKind::busy(), 1.2), "You will be busy for 1 second.");
        assert_eq!(duration_notice(&StatusKind::stunned(), 0.01), "You will be stunned for 1 second.");
        assert_eq!(duration_notice(&StatusKind::busy(), 1.99), "You will be busy for 2 seconds.");
    }

    #[test]
    fn test_second_arm_is_rejected() {
        let (mut world, _clock, mut scheduler, actor) = setup();
        let (first, _) = counted(actor, 5.0);
        let (second, _) = counted(actor, 5.0);
        let busy = StatusKind::busy();

        assert!(scheduler.arm(&mut world, actor, Some(&first), 5.0, &busy));
        assert!(!scheduler.arm(&mut world, actor, Some(&second), 5.0, &busy));
        let pending = scheduler.pending_action(actor, &busy).unwrap();
        assert!(Rc::ptr_eq(&pending, &first));
        assert_eq!(scheduler.timers().len(), 1);
    }

    #[test]
    fn test_busy_and_stunned_coexist() {
        let (mut world, _clock, mut scheduler, actor) = setup();
        let (action, _) = counted(actor, 5.0);
        assert!(scheduler.arm(&mut world, actor, Some(&action), 5.0, &StatusKind::busy()));
        assert!(scheduler.arm(&mut world, actor, Some(&action), 2.0, &StatusKind::stunned()));
        assert!(scheduler.pending_action(actor, &StatusKind::stunned()).is_none());
        assert_eq!(scheduler.len(), 2);
    }

    #[test]
    fn test_unknown_kind_and_missing_actor() {
        let (mut world, _clock, mut scheduler, actor) = setup();
        assert!(!scheduler.arm(&mut world, actor, None, 1.0, &StatusKind::new("asleep")));
        assert!(!scheduler.arm(&mut world, EntityId::new(77), None, 1.0, &StatusKind::busy()));
        assert!(!scheduler.arm(&mut world, actor, None, f64::NAN, &StatusKind::busy()));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_timer_fire_completes_once() {
        let (mut world, clock, mut scheduler, actor) = setup();
        let (action, count) = counted(actor, 2.0);
        assert!(scheduler.defer(&mut world, &action));

        clock.advance(1.0);
        assert_eq!(scheduler.advance(&mut world), 0);
        clock.advance(1.0);
        assert_eq!(scheduler.advance(&mut world), 1);
        assert_eq!(count.get(), 1);
        assert!(scheduler.is_empty());
        assert!(scheduler.timers().is_empty());
        assert_eq!(scheduler.advance(&mut world), 0);
    }

    #[test]
    fn test_remaining_is_stable_while_active() {
        let (mut world, clock, mut scheduler, actor) = setup();
        let busy = StatusKind::busy();
        scheduler.arm(&mut world, actor, None, 4.0, &busy);
        clock.advance(1.5);
        assert_eq!(scheduler.remaining(&mut world, actor, &busy), 2.5);
        assert_eq!(scheduler.remaining(&mut world, actor, &busy), 2.5);
        assert!(scheduler.is_active(actor, &busy));
    }

    #[test]
    fn test_overdue_record_heals_on_query() {
        let (mut world, clock, mut scheduler, actor) = setup();
        let (action, count) = counted(actor, 1.0);
        let busy = StatusKind::busy();
        scheduler.arm(&mut world, actor, Some(&action), 1.0, &busy);

        clock.advance(5.0);
        assert_eq!(scheduler.remaining(&mut world, actor, &busy), 0.0);
        assert!(!scheduler.is_active(actor, &busy));
        assert_eq!(count.get(), 1);
        // the late timer finds nothing to do
        assert_eq!(scheduler.advance(&mut world), 0);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_dropped_action_is_not_completed() {
        let (mut world, clock, mut scheduler, actor) = setup();
        let (action, count) = counted(actor, 1.0);
        scheduler.arm(&mut world, actor, Some(&action), 1.0, &StatusKind::busy());
        drop(action);
        assert!(scheduler.pending_action(actor, &StatusKind::busy()).is_none());

        clock.advance(1.0);
        assert_eq!(scheduler.advance(&mut world), 1);
        assert_eq!(count.get(), 0);
        assert_eq!(world.messages_for(actor).last(), Some(&"You are no longer busy."));
    }

    #[test]
    fn test_learning_does_not_gate_readiness() {
        let (mut world, _clock, mut scheduler, actor) = setup();
        let study = TimedAction::new("study", actor, 30.0)
            .with_kind(StatusKind::learning())
            .into_ref();
        assert!(scheduler.defer(&mut world, &study));
        assert!(scheduler.is_ready(&mut world, actor));

        let (wear, _) = counted(actor, 3.0);
        assert!(scheduler.defer(&mut world, &wear));
        assert!(!scheduler.is_ready(&mut world, actor));
    }

    #[test]
    fn test_completion_can_rearm_its_actor() {
        let (mut world, clock, mut scheduler, actor) = setup();
        let follow_up = TimedAction::new("recover", actor, 2.0).into_ref();
        let keep = follow_up.clone();
        let strike = TimedAction::new("punch", actor, 1.0)
            .completes_with(move |action, ctx| {
                let kind = StatusKind::busy();
                ctx.scheduler
                    .arm(ctx.world, action.actor(), Some(&keep), 2.0, &kind)
            })
            .into_ref();

        scheduler.defer(&mut world, &strike);
        clock.advance(1.0);
        scheduler.advance(&mut world);
        let pending = scheduler.pending_action(actor, &StatusKind::busy()).unwrap();
        assert!(Rc::ptr_eq(&pending, &follow_up));
    }

    #[test]
    fn test_overdue_completion_rearm_is_not_replaced() {
        let (mut world, clock, mut scheduler, actor) = setup();
        let busy = StatusKind::busy();
        let recover = TimedAction::new("recover", actor, 10.0).into_ref();
        let keep = recover.clone();
        let punch = TimedAction::new("punch", actor, 1.0)
            .completes_with(move |action, ctx| {
                let kind = StatusKind::busy();
                ctx.scheduler
                    .arm(ctx.world, action.actor(), Some(&keep), 10.0, &kind)
            })
            .into_ref();
        assert!(scheduler.arm(&mut world, actor, Some(&punch), 1.0, &busy));

        // the punch timer is never drained
        clock.advance(2.0);
        let (wear, count) = counted(actor, 5.0);
        assert!(!scheduler.arm(&mut world, actor, Some(&wear), 5.0, &busy));

        let pending = scheduler.pending_action(actor, &busy).unwrap();
        assert!(Rc::ptr_eq(&pending, &recover));
        assert_eq!(scheduler.timers().len(), 1);
        assert_eq!(scheduler.remaining(&mut world, actor, &busy), 10.0);
        assert_eq!(count.get(), 0);
        assert_eq!(
            world.messages_for(actor),
            vec![
                "You will be busy for 1 second.",
                "You are no longer busy.",
                "You will be busy for 10 seconds.",
            ]
        );
    }

    #[test]
    fn test_ended_notice_comes_before_completion() {
        let (mut world, clock, mut scheduler, actor) = setup();
        let action = TimedAction::new("wear", actor, 2.0)
            .completes_with(|action, ctx| {
                ctx.msg(action.actor(), "You put on a hat.");
                true
            })
            .into_ref();
        scheduler.defer(&mut world, &action);
        world.drain();

        clock.advance(2.0);
        scheduler.advance(&mut world);
        assert_eq!(
            world.messages_for(actor),
            vec!["You are no longer busy.", "You put on a hat."]
        );
    }

    #[test]
    fn test_completion_stopping_itself_is_safe() {
        let (mut world, clock, mut scheduler, actor) = setup();
        let action = TimedAction::new("wear", actor, 1.0)
            .completes_with(|action, ctx| {
                let kind = StatusKind::busy();
                // already resolved, so this is the "not committed" path
                !ctx.scheduler
                    .force_stop(ctx.world, action.actor(), action.actor(), None, None, &kind)
            })
            .into_ref();
        scheduler.defer(&mut world, &action);
        clock.advance(1.0);
        assert_eq!(scheduler.advance(&mut world), 1);
        assert!(world
            .messages_for(actor)
            .contains(&"You are not committed to an action."));
    }
}
