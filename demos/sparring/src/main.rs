//! Sparring demo
//!
//! Two characters from the standard rules trade punches on a real clock.
//! Run with `RUST_LOG=umud_core=debug` to watch the scheduler.

use std::error::Error;
use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use umud_core::{
    ActionContext, ActionRef, Cmd, DefId, DeferredAction, EntityId, Scheduler, StatusKind, SystemClock,
    TimedAction, World,
};
use umud_script::RuleSet;

fn punch(attacker: EntityId, target: EntityId, delay: f64) -> ActionRef {
    TimedAction::new("punch", attacker, delay)
        .with_target(target)
        .armed_text("You wind up a punch.")
        .completes_with(land_punch)
        .into_ref()
}

fn land_punch(action: &TimedAction, ctx: &mut ActionContext<'_>) -> bool {
    let Some(target) = action.target() else {
        return false;
    };
    let attacker = action.actor();
    let world = &mut *ctx.world;
    let Some(victim) = world.entities.get_mut(target) else {
        return false;
    };
    let part = match victim.get_body_part(None, &mut world.rng) {
        Ok((name, _)) => name,
        Err(err) => {
            tracing::warn!(%err, "no body part to hit");
            return false;
        }
    };
    let reduction = victim
        .table("dr")
        .ok()
        .and_then(|dr| dr.number("BLG").ok())
        .unwrap_or(0.0);
    let damage = (world.rng.roll(1, 4) as f64 - reduction).max(0.0);

    let mut hp = victim.element("hp");
    hp -= damage;
    let left = hp.to_string();
    drop(hp);

    let attacker_name = world.name_of(attacker);
    let victim_name = world.name_of(target);
    world.msg(
        attacker,
        format!("You punch {} in the {} for {} damage.", victim_name, part, damage),
    );
    world.msg(
        target,
        format!(
            "{} punches you in the {} for {} damage. You have {} hp.",
            attacker_name, part, damage, left
        ),
    );
    true
}

fn print_outbox(world: &mut World) {
    for cmd in world.drain().into_vec() {
        match cmd {
            Cmd::Msg { to, text } => println!("[{}] {}", world.name_of(to), text),
            Cmd::Execute { actor, command } => println!("[{}] > {}", world.name_of(actor), command),
            _ => {}
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let rules = RuleSet::standard()?;
    let character = rules.template(&DefId::new("character"))?;
    let mut world = World::new(SystemClock).with_seed(7);
    let mut scheduler = Scheduler::new(rules.scheduler_config());

    let ann = world.spawn("Ann", "character", &character);
    let bea = world.spawn("Bea", "character", &character);
    world.table(bea, "dr")?.set_key("BLG", 1)?;
    tracing::info!(%ann, %bea, "spawned");

    // a second arm while busy is refused
    scheduler.defer(&mut world, &punch(ann, bea, 1.0));
    let refused = !scheduler.defer(&mut world, &punch(ann, bea, 1.0));
    tracing::info!(refused, "double arm");
    scheduler.defer(&mut world, &punch(bea, ann, 2.5));
    print_outbox(&mut world);

    // Ann asks Bea to stop; Bea keeps going
    scheduler.request_stop(&mut world, ann, bea, None, None);
    let reply = scheduler.answer_prompt(&mut world, bea, "ignore");
    tracing::info!(?reply, "stop request answered");
    print_outbox(&mut world);

    let busy = StatusKind::busy();
    let mut rounds = 0;
    while rounds < 3 {
        thread::sleep(Duration::from_millis(100));
        let fired = scheduler.advance(&mut world);
        print_outbox(&mut world);
        for actor in [ann, bea] {
            if fired > 0 && scheduler.is_ready(&mut world, actor) {
                let target = if actor == ann { bea } else { ann };
                scheduler.defer(&mut world, &punch(actor, target, 1.5));
                rounds += 1;
            }
        }
        print_outbox(&mut world);
    }

    // end the fight: Ann's swing is stopped, Bea's lands now
    scheduler.force_stop(&mut world, bea, ann, None, Some("look"), &busy);
    scheduler.complete_early(&mut world, ann, bea, None);
    print_outbox(&mut world);

    for id in [ann, bea] {
        let entity = world.entity_mut(id)?;
        let hp = entity.element("hp").to_string();
        let out = entity.condition("unconscious")?;
        tracing::info!(name = %entity.name, hp = %hp, unconscious = out, "final state");
    }
    Ok(())
}
