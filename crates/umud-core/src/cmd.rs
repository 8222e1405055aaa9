//! Outbox commands for the host
//!
//! The core never talks to sessions or the command parser directly. It
//! queues [`Cmd`] values and the host drains them: `Msg` goes to the
//! entity's session, `Execute` is fed to its command handler.

use crate::EntityId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cmd {
    /// No operation
    None,

    /// Several commands, in order
    Batch(Vec<Cmd>),

    /// Text notice for an entity
    Msg { to: EntityId, text: String },

    /// Run a command line as if the entity had typed it
    Execute { actor: EntityId, command: String },
}

impl Cmd {
    pub fn none() -> Self {
        Cmd::None
    }

    /// Create a batch, flattening nested batches and dropping `None`
    pub fn batch(cmds: Vec<Cmd>) -> Self {
        let mut flattened: Vec<Cmd> = cmds
            .into_iter()
            .flat_map(|cmd| match cmd {
                Cmd::None => vec![],
                Cmd::Batch(inner) => inner,
                other => vec![other],
            })
            .collect();

        match flattened.len() {
            0 => Cmd::None,
            1 => flattened.pop().unwrap_or(Cmd::None),
            _ => Cmd::Batch(flattened),
        }
    }

    pub fn msg(to: EntityId, text: impl Into<String>) -> Self {
        Cmd::Msg {
            to,
            text: text.into(),
        }
    }

    pub fn execute(actor: EntityId, command: impl Into<String>) -> Self {
        Cmd::Execute {
            actor,
            command: command.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Cmd::None)
    }

    /// Flatten into a plain list
    pub fn into_vec(self) -> Vec<Cmd> {
        match self {
            Cmd::None => vec![],
            Cmd::Batch(cmds) => cmds,
            other => vec![other],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_of_one_unwraps() {
        let cmd = Cmd::batch(vec![Cmd::None, Cmd::msg(EntityId::new(1), "hi"), Cmd::None]);
        assert!(matches!(cmd, Cmd::Msg { .. }));
    }

    #[test]
    fn test_batch_flattens_nested() {
        let a = EntityId::new(1);
        let cmd = Cmd::batch(vec![
            Cmd::batch(vec![Cmd::msg(a, "one"), Cmd::execute(a, "look")]),
            Cmd::msg(a, "two"),
        ]);
        assert_eq!(cmd.into_vec().len(), 3);
        assert!(Cmd::batch(vec![]).is_none());
    }
}
