//! The world: entities, clock, rng and outbox

use crate::{
    Clock, Cmd, Element, Entity, EntityId, EntityStore, EntityTemplate, Error, GameRng,
    ListElement, Result,
};
use std::fmt;

pub struct World {
    pub entities: EntityStore,
    pub rng: GameRng,
    clock: Box<dyn Clock>,
    outbox: Vec<Cmd>,
}

impl World {
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            entities: EntityStore::new(),
            rng: GameRng::default(),
            clock: Box::new(clock),
            outbox: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = GameRng::new(seed);
        self
    }

    /// Current time in seconds
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Create an entity and apply a template to it
    pub fn spawn(
        &mut self,
        name: impl Into<String>,
        kind: &str,
        template: &EntityTemplate,
    ) -> EntityId {
        let entity = self.entities.create(name, kind);
        template.apply(entity);
        entity.id
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.entities
            .get(id)
            .ok_or_else(|| Error::EntityNotFound(id.to_string()))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities
            .get_mut(id)
            .ok_or_else(|| Error::EntityNotFound(id.to_string()))
    }

    /// Cell on an entity; a missing entity cannot hold one
    pub fn element(&mut self, id: EntityId, name: &str) -> Result<Element<'_>> {
        self.entities
            .get_mut(id)
            .map(|e| e.element(name))
            .ok_or_else(|| Error::InvalidContainer(id.to_string()))
    }

    /// Table on an entity; a missing entity cannot hold one
    pub fn table(&mut self, id: EntityId, name: &str) -> Result<ListElement<'_>> {
        match self.entities.get_mut(id) {
            Some(entity) => entity.table(name),
            None => Err(Error::InvalidContainer(id.to_string())),
        }
    }

    pub fn name_of(&self, id: EntityId) -> String {
        self.entities.name_of(id)
    }

    /// Queue a notice for an entity
    pub fn msg(&mut self, to: EntityId, text: impl Into<String>) {
        let text = text.into();
        tracing::trace!(%to, %text, "msg");
        self.outbox.push(Cmd::msg(to, text));
    }

    /// Queue a command line to run as `actor`
    pub fn execute_cmd(&mut self, actor: EntityId, command: impl Into<String>) {
        self.outbox.push(Cmd::execute(actor, command));
    }

    pub fn push(&mut self, cmd: Cmd) {
        self.outbox.extend(cmd.into_vec());
    }

    pub fn pending(&self) -> &[Cmd] {
        &self.outbox
    }

    /// Take everything queued so far
    pub fn drain(&mut self) -> Cmd {
        Cmd::batch(std::mem::take(&mut self.outbox))
    }

    /// Notices queued for one entity, oldest first
    pub fn messages_for(&self, id: EntityId) -> Vec<&str> {
        self.outbox
            .iter()
            .filter_map(|cmd| match cmd {
                Cmd::Msg { to, text } if *to == id => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Command lines queued for one entity, oldest first
    pub fn commands_for(&self, id: EntityId) -> Vec<&str> {
        self.outbox
            .iter()
            .filter_map(|cmd| match cmd {
                Cmd::Execute { actor, command } if *actor == id => Some(command.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.entities.len())
            .field("now", &self.now())
            .field("outbox", &self.outbox.len())
            .finish()
    }
}
