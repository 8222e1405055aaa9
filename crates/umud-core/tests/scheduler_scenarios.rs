use std::cell::Cell;
use std::rc::Rc;
use umud_core::{
    Cmd, DeferredAction, EntityId, EntityTemplate, ManualClock, Scheduler, SchedulerConfig,
    StatusKind, TimedAction, Value, World,
};

fn world() -> (World, ManualClock, Scheduler) {
    let clock = ManualClock::new(5_000.0);
    let world = World::new(clock.clone());
    (world, clock, Scheduler::new(SchedulerConfig::standard()))
}

fn spawn(world: &mut World, name: &str) -> EntityId {
    world.spawn(name, "character", &EntityTemplate::character())
}

#[test]
fn cooldown_message() {
    let (mut world, clock, mut scheduler) = world();
    let a = spawn(&mut world, "Ann");
    let action = TimedAction::new("search", a, 3.0).into_ref();

    assert!(scheduler.arm(&mut world, a, Some(&action), 3.0, &StatusKind::busy()));
    assert_eq!(world.messages_for(a), vec!["You will be busy for 3 seconds."]);
    world.drain();

    assert!(!scheduler.is_ready(&mut world, a));
    world.drain();

    clock.advance(3.0);
    scheduler.advance(&mut world);
    assert_eq!(world.messages_for(a), vec!["You are no longer busy."]);
    assert!(scheduler.is_ready(&mut world, a));
}

#[test]
fn forced_interruption() {
    let (mut world, _clock, mut scheduler) = world();
    let b = spawn(&mut world, "Bea");
    let c = spawn(&mut world, "Cal");
    let ran = Rc::new(Cell::new(false));
    let flag = ran.clone();
    let action = TimedAction::new("kick", b, 5.0)
        .completes_with(move |_, _| {
            flag.set(true);
            true
        })
        .into_ref();
    assert!(scheduler.defer(&mut world, &action));
    world.drain();

    let busy = StatusKind::busy();
    assert!(scheduler.force_stop(
        &mut world,
        c,
        b,
        Some("C interrupts your action."),
        Some("look"),
        &busy
    ));
    assert!(!ran.get());
    assert!(scheduler.pending_action(b, &busy).is_none());
    assert!(!scheduler.is_active(b, &busy));
    assert!(world.messages_for(b).contains(&"C interrupts your action."));
    assert_eq!(world.commands_for(b), vec!["look"]);
    assert!(scheduler.timers().is_empty());
}

#[test]
fn idempotent_early_completion() {
    let (mut world, _clock, mut scheduler) = world();
    let a = spawn(&mut world, "Ann");
    let count = Rc::new(Cell::new(0));
    let inner = count.clone();
    let action = TimedAction::new("wear", a, 0.01)
        .completes_with(move |_, _| {
            inner.set(inner.get() + 1);
            true
        })
        .into_ref();

    assert!(scheduler.arm(&mut world, a, Some(&action), 0.01, &StatusKind::busy()));
    assert!(scheduler.complete_early(&mut world, a, a, None));
    assert!(!scheduler.complete_early(&mut world, a, a, None));
    assert_eq!(count.get(), 1);
}

#[test]
fn stale_deadline_self_heals() {
    let (mut world, clock, mut scheduler) = world();
    let a = spawn(&mut world, "Ann");
    let busy = StatusKind::busy();
    scheduler.arm(&mut world, a, None, 2.0, &busy);

    // deadline passes but nobody drains the timer queue
    clock.advance(10.0);
    assert_eq!(scheduler.remaining(&mut world, a, &busy), 0.0);
    assert!(!scheduler.is_active(a, &busy));
    assert!(scheduler.timers().is_empty());
    assert!(scheduler.is_ready(&mut world, a));
}

#[test]
fn completion_changes_cells_on_target() {
    let (mut world, clock, mut scheduler) = world();
    let attacker = spawn(&mut world, "Ann");
    let victim = spawn(&mut world, "Bea");
    world
        .table(victim, "dr")
        .unwrap()
        .set_key("BLG", 3)
        .unwrap();

    let punch = TimedAction::new("punch", attacker, 2.0)
        .with_target(victim)
        .completes_with(|action, ctx| {
            let Some(target) = action.target() else {
                return false;
            };
            let reduction = match ctx.world.table(target, "dr") {
                Ok(dr) => dr.number("BLG").unwrap_or(0.0),
                Err(_) => return false,
            };
            let damage = (110.0 - reduction).max(0.0);
            match ctx.world.element(target, "hp") {
                Ok(mut hp) => {
                    hp -= damage;
                    true
                }
                Err(_) => false,
            }
        })
        .into_ref();

    assert!(scheduler.defer(&mut world, &punch));
    clock.advance(2.0);
    assert_eq!(scheduler.advance(&mut world), 1);

    let hp = world.element(victim, "hp").unwrap().get();
    assert_eq!(hp, -7.0);
    let victim_entity = world.entity_mut(victim).unwrap();
    assert_eq!(victim_entity.condition("unconscious"), Ok(true));
    assert_eq!(
        victim_entity.attributes.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
        vec!["dr_BLG", "hp_value", "conditions_unconscious"]
    );
}

#[test]
fn timers_for_different_actors_interleave() {
    let (mut world, clock, mut scheduler) = world();
    let a = spawn(&mut world, "Ann");
    let b = spawn(&mut world, "Bea");
    let slow = TimedAction::new("study", a, 4.0).into_ref();
    let fast = TimedAction::new("wear", b, 1.0).into_ref();
    scheduler.defer(&mut world, &slow);
    scheduler.defer(&mut world, &fast);
    world.drain();

    clock.advance(1.0);
    assert_eq!(scheduler.advance(&mut world), 1);
    assert_eq!(world.messages_for(b), vec!["You are no longer busy."]);
    assert!(world.messages_for(a).is_empty());
    world.drain();

    clock.advance(3.0);
    assert_eq!(scheduler.advance(&mut world), 1);
    let drained = world.drain();
    assert_eq!(drained, Cmd::msg(a, "You are no longer busy."));
}

#[test]
fn table_sparse_round_trip_on_entity() {
    let (mut world, _clock, _scheduler) = world();
    let a = spawn(&mut world, "Ann");
    {
        let mut dr = world.table(a, "dr").unwrap();
        dr.set_key("ACD", 3).unwrap();
        dr.set_key("ACD", 0).unwrap();
        assert_eq!(dr.get("ACD"), Ok(Value::Int(0)));
        dr.set_key("ACD", 5).unwrap();
    }
    let entity = world.entity(a).unwrap();
    assert_eq!(entity.attributes.len(), 1);
}
