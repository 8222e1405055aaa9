//! Saving and restoring durable statuses
//!
//! Only records armed on a durable timer are saved, and only their deadline.
//! Action references never survive a restart; a restored record resolves
//! with its notice and no completion.

use super::{duration_notice, Scheduler, StatusRecord};
use crate::{EntityId, StatusKind, TimerEvent, World};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub actor: EntityId,
    pub kind: StatusKind,
    pub deadline: f64,
}

impl Scheduler {
    /// Records whose timer was armed durable, in deadline order
    pub fn snapshot(&self) -> Vec<StatusSnapshot> {
        self.timers
            .durable()
            .filter_map(|(handle, _, event)| match event {
                TimerEvent::StatusExpired { actor, kind } => {
                    let record = self.records.get(&(*actor, kind.clone()))?;
                    (record.timer == handle).then(|| StatusSnapshot {
                        actor: *actor,
                        kind: kind.clone(),
                        deadline: record.deadline,
                    })
                }
            })
            .collect()
    }

    /// Re-arm saved records whose deadline is still ahead. Returns how
    /// many were restored.
    pub fn restore(&mut self, world: &mut World, snapshots: &[StatusSnapshot]) -> usize {
        let now = world.now();
        let mut restored = 0;
        for snap in snapshots {
            let durable = self.config.kind(&snap.kind).is_some_and(|k| k.durable);
            let key = (snap.actor, snap.kind.clone());
            if !durable || !world.entities.contains(snap.actor) || self.records.contains_key(&key) {
                tracing::warn!(actor = %snap.actor, kind = %snap.kind, "skipping saved status");
                continue;
            }
            let left = snap.deadline - now;
            if left <= 0.0 {
                tracing::debug!(actor = %snap.actor, kind = %snap.kind, "saved status already over");
                continue;
            }

            let timer = self.timers.delay(
                now,
                left,
                TimerEvent::StatusExpired {
                    actor: snap.actor,
                    kind: snap.kind.clone(),
                },
                true,
            );
            self.records.insert(
                key,
                StatusRecord {
                    started: now,
                    deadline: snap.deadline,
                    action: None,
                    action_name: None,
                    timer,
                },
            );
            world.msg(snap.actor, duration_notice(&snap.kind, left));
            restored += 1;
        }
        restored
    }
}
