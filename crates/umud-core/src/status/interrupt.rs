//! Ending another actor's status early
//!
//! `force_stop` discards the pending action, `complete_early` runs it now,
//! and `request_stop` asks the target first. A target has at most one
//! open stop request; a new request replaces the old one.

use super::Scheduler;
use crate::{EntityId, StatusKind, World};

/// An open "do you want to stop?" question
#[derive(Debug, Clone, PartialEq)]
pub struct StopRequest {
    pub requester: EntityId,
    pub kind: StatusKind,
    pub prompt: String,
    pub follow_up: Option<String>,
}

/// What an answer to a stop request did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptReply {
    /// No request was open
    NoPrompt,
    /// "yes": the status was stopped
    Stopped,
    /// "yes", but the status had already ended
    Expired,
    /// "ignore": the request was dropped
    Ignored,
    /// Anything else ran as a normal command and the prompt was repeated
    PassedThrough,
}

impl Scheduler {
    fn not_committed(&self, world: &mut World, actor: EntityId, target: EntityId) {
        let text = if actor == target {
            "You are not committed to an action.".to_string()
        } else {
            format!("{} is not committed to an action.", world.name_of(target))
        };
        world.msg(actor, text);
    }

    /// Stop `target`'s status without running its completion
    ///
    /// The target is told who stopped it (or `message`), then
    /// `follow_up` is queued as a command for the target.
    pub fn force_stop(
        &mut self,
        world: &mut World,
        actor: EntityId,
        target: EntityId,
        message: Option<&str>,
        follow_up: Option<&str>,
        kind: &StatusKind,
    ) -> bool {
        if self.remaining(world, target, kind) <= 0.0 {
            self.not_committed(world, actor, target);
            return false;
        }
        let label = self.action_label(target, kind);
        if !self.resolve(world, target, kind, false) {
            self.not_committed(world, actor, target);
            return false;
        }
        tracing::debug!(%actor, %target, %kind, action = %label, "force stopped");

        let text = match message {
            Some(text) => text.to_string(),
            None => format!("{} stopped your {} action.", world.name_of(actor), label),
        };
        world.msg(target, text);
        if let Some(command) = follow_up {
            world.execute_cmd(target, command);
        }
        true
    }

    /// Run `target`'s pending busy action now
    pub fn complete_early(
        &mut self,
        world: &mut World,
        actor: EntityId,
        target: EntityId,
        message: Option<&str>,
    ) -> bool {
        let busy = StatusKind::busy();
        if self.remaining(world, target, &busy) <= 0.0 {
            self.not_committed(world, actor, target);
            return false;
        }
        let label = self.action_label(target, &busy);
        if !self.resolve(world, target, &busy, true) {
            self.not_committed(world, actor, target);
            return false;
        }
        tracing::debug!(%actor, %target, action = %label, "completed early");

        let text = match message {
            Some(text) => text.to_string(),
            None => format!(
                "{} allowed you to complete your {} action early.",
                world.name_of(actor),
                label
            ),
        };
        world.msg(target, text);
        true
    }

    /// Ask `target` whether to stop its busy action
    pub fn request_stop(
        &mut self,
        world: &mut World,
        actor: EntityId,
        target: EntityId,
        message: Option<&str>,
        follow_up: Option<&str>,
    ) -> bool {
        let busy = StatusKind::busy();
        if self.remaining(world, target, &busy) <= 0.0 {
            self.not_committed(world, actor, target);
            return false;
        }
        let prompt = match message {
            Some(text) => text.to_string(),
            None => format!(
                "{} would like you to stop your {} action. Stop? (yes/ignore)",
                world.name_of(actor),
                self.action_label(target, &busy)
            ),
        };
        let request = StopRequest {
            requester: actor,
            kind: busy,
            prompt: prompt.clone(),
            follow_up: follow_up.map(str::to_string),
        };
        if self.prompts.insert(target, request).is_some() {
            tracing::debug!(%target, "replaced open stop request");
        }
        world.msg(target, prompt);
        true
    }

    /// Feed the target's next line of input to its open stop request
    pub fn answer_prompt(&mut self, world: &mut World, target: EntityId, input: &str) -> PromptReply {
        let Some(request) = self.prompts.get(&target).cloned() else {
            return PromptReply::NoPrompt;
        };

        match input.trim().to_lowercase().as_str() {
            "y" | "yes" => {
                self.prompts.shift_remove(&target);
                let label = self.action_label(target, &request.kind);
                let text = format!("You stop your {} action.", label);
                let stopped = self.force_stop(
                    world,
                    request.requester,
                    target,
                    Some(&text),
                    request.follow_up.as_deref(),
                    &request.kind,
                );
                if stopped {
                    PromptReply::Stopped
                } else {
                    PromptReply::Expired
                }
            }
            "i" | "ignore" => {
                self.prompts.shift_remove(&target);
                PromptReply::Ignored
            }
            _ => {
                world.execute_cmd(target, input.trim());
                world.msg(target, request.prompt);
                PromptReply::PassedThrough
            }
        }
    }

    pub fn prompt_for(&self, target: EntityId) -> Option<&StopRequest> {
        self.prompts.get(&target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionRef, EntityTemplate, ManualClock, SchedulerConfig, TimedAction};
    use std::cell::Cell;
    use std::rc::Rc;

    struct Fixture {
        world: World,
        clock: ManualClock,
        scheduler: Scheduler,
        char1: EntityId,
        char2: EntityId,
        count: Rc<Cell<u32>>,
        action: ActionRef,
    }

    fn fixture() -> Fixture {
        let clock = ManualClock::new(0.0);
        let mut world = World::new(clock.clone());
        let template = EntityTemplate::character();
        let char1 = world.spawn("Char", "character", &template);
        let char2 = world.spawn("Char2", "character", &template);
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        let action = TimedAction::new("wear", char2, 3.0)
            .completes_with(move |_, ctx| {
                inner.set(inner.get() + 1);
                ctx.world.msg(char2, "Char2 puts on test hat.");
                true
            })
            .into_ref();
        Fixture {
            world,
            clock,
            scheduler: Scheduler::new(SchedulerConfig::standard()),
            char1,
            char2,
            count,
            action,
        }
    }

    fn armed() -> Fixture {
        let mut f = fixture();
        assert!(f.scheduler.defer(&mut f.world, &f.action));
        f.world.drain();
        f
    }

    #[test]
    fn test_force_stop_default_attribution() {
        let mut f = armed();
        let busy = StatusKind::busy();
        assert!(f.scheduler.force_stop(&mut f.world, f.char1, f.char2, None, None, &busy));
        assert_eq!(
            f.world.messages_for(f.char2),
            vec!["You are no longer busy.", "Char stopped your wear action."]
        );
        assert_eq!(f.count.get(), 0);
    }

    #[test]
    fn test_force_stop_nothing_pending() {
        let mut f = fixture();
        let busy = StatusKind::busy();
        assert!(!f.scheduler.force_stop(&mut f.world, f.char1, f.char2, None, Some("look"), &busy));
        assert_eq!(f.world.messages_for(f.char1), vec!["Char2 is not committed to an action."]);
        assert!(f.world.commands_for(f.char2).is_empty());
    }

    #[test]
    fn test_complete_early_runs_completion_once() {
        let mut f = armed();
        assert!(f.scheduler.complete_early(&mut f.world, f.char1, f.char2, None));
        assert!(!f.scheduler.complete_early(&mut f.world, f.char1, f.char2, None));
        assert_eq!(f.count.get(), 1);
        assert_eq!(
            f.world.messages_for(f.char2),
            vec![
                "You are no longer busy.",
                "Char2 puts on test hat.",
                "Char allowed you to complete your wear action early.",
            ]
        );
        assert_eq!(f.world.messages_for(f.char1), vec!["Char2 is not committed to an action."]);
    }

    #[test]
    fn test_request_stop_yes() {
        let mut f = armed();
        assert!(f.scheduler.request_stop(&mut f.world, f.char1, f.char2, None, Some("dodge")));
        assert_eq!(
            f.world.messages_for(f.char2),
            vec!["Char would like you to stop your wear action. Stop? (yes/ignore)"]
        );
        f.world.drain();

        assert_eq!(f.scheduler.answer_prompt(&mut f.world, f.char2, "Yes"), PromptReply::Stopped);
        assert!(f.scheduler.prompt_for(f.char2).is_none());
        assert_eq!(
            f.world.messages_for(f.char2),
            vec!["You are no longer busy.", "You stop your wear action."]
        );
        assert_eq!(f.world.commands_for(f.char2), vec!["dodge"]);
        assert_eq!(f.count.get(), 0);
    }

    #[test]
    fn test_request_stop_other_input_passes_through() {
        let mut f = armed();
        f.scheduler
            .request_stop(&mut f.world, f.char1, f.char2, Some("Stop wearing?"), None);
        f.world.drain();

        let reply = f.scheduler.answer_prompt(&mut f.world, f.char2, "look");
        assert_eq!(reply, PromptReply::PassedThrough);
        assert_eq!(f.world.commands_for(f.char2), vec!["look"]);
        assert_eq!(f.world.messages_for(f.char2), vec!["Stop wearing?"]);
        assert!(f.scheduler.prompt_for(f.char2).is_some());

        assert_eq!(f.scheduler.answer_prompt(&mut f.world, f.char2, "i"), PromptReply::Ignored);
        assert_eq!(f.scheduler.answer_prompt(&mut f.world, f.char2, "yes"), PromptReply::NoPrompt);
        assert!(f.scheduler.is_active(f.char2, &StatusKind::busy()));
    }

    #[test]
    fn test_single_open_request() {
        let mut f = armed();
        f.scheduler.request_stop(&mut f.world, f.char1, f.char2, Some("first"), None);
        f.scheduler.request_stop(&mut f.world, f.char1, f.char2, Some("second"), None);
        assert_eq!(f.scheduler.prompt_for(f.char2).map(|r| r.prompt.as_str()), Some("second"));
    }

    #[test]
    fn test_request_cleared_when_status_ends() {
        let mut f = armed();
        f.scheduler.request_stop(&mut f.world, f.char1, f.char2, None, None);
        f.clock.advance(3.0);
        f.scheduler.advance(&mut f.world);
        assert!(f.scheduler.prompt_for(f.char2).is_none());
        assert_eq!(f.count.get(), 1);
        assert_eq!(f.scheduler.answer_prompt(&mut f.world, f.char2, "yes"), PromptReply::NoPrompt);
    }

    #[test]
    fn test_request_stop_when_idle() {
        let mut f = fixture();
        assert!(!f.scheduler.request_stop(&mut f.world, f.char2, f.char2, None, None));
        assert_eq!(f.world.messages_for(f.char2), vec!["You are not committed to an action."]);
        assert!(f.scheduler.prompt_for(f.char2).is_none());
    }
}
