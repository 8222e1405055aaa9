//! Characters and objects, and the store that owns them

use crate::{
    Attributes, Body, DefId, Element, ElementHooks, ElementSpec, EntityId, Error, GameRng,
    ListElement, ListElementSpec, Result, Value,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A character or object
///
/// Only `attributes` is saved. Declared cells and tables, hooks and the
/// body are rule-set wiring and are re-applied when an entity is loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub kind: DefId,
    /// Durable storage
    pub attributes: Attributes,
    /// Ephemeral storage, never saved
    #[serde(skip)]
    pub nattributes: Attributes,
    #[serde(skip)]
    elements: IndexMap<String, ElementSpec>,
    #[serde(skip)]
    tables: IndexMap<String, ListElementSpec>,
    #[serde(skip)]
    pub(crate) hooks: IndexMap<String, ElementHooks>,
    #[serde(skip)]
    pub(crate) dispatching: HashSet<String>,
    #[serde(skip)]
    body: Option<Body>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>, kind: impl Into<DefId>) -> Self {
        Self {
            id,
            name: name.into(),
            kind: kind.into(),
            attributes: Attributes::new(),
            nattributes: Attributes::new(),
            elements: IndexMap::new(),
            tables: IndexMap::new(),
            hooks: IndexMap::new(),
            dispatching: HashSet::new(),
            body: None,
        }
    }

    /// Register the defaults a cell should use
    pub fn declare_element(&mut self, spec: ElementSpec) {
        self.elements.insert(spec.name.clone(), spec);
    }

    /// Cell handle; undeclared names get the standard defaults
    pub fn element(&mut self, name: &str) -> Element<'_> {
        let spec = self
            .elements
            .entry(name.to_string())
            .or_insert_with(|| ElementSpec::new(name))
            .clone();
        Element::new(self, spec)
    }

    pub fn element_names(&self) -> impl Iterator<Item = &str> {
        self.elements.keys().map(String::as_str)
    }

    pub fn set_hooks(&mut self, cell: impl Into<String>, hooks: ElementHooks) {
        self.hooks.insert(cell.into(), hooks);
    }

    pub fn clear_hooks(&mut self, cell: &str) -> Option<ElementHooks> {
        self.hooks.shift_remove(cell)
    }

    pub fn declare_table(&mut self, spec: ListElementSpec) {
        self.tables.insert(spec.name.clone(), spec);
    }

    /// Table handle over durable storage
    pub fn table(&mut self, name: &str) -> Result<ListElement<'_>> {
        let spec = self
            .tables
            .get(name)
            .cloned()
            .ok_or_else(|| Error::unknown_key(format!("tables of {}", self.id), name))?;
        Ok(ListElement::attach(&mut self.attributes, spec))
    }

    pub fn set_body(&mut self, body: Body) {
        self.body = Some(body);
    }

    pub fn body(&self) -> Option<&Body> {
        self.body.as_ref()
    }

    fn part_body(&self, part: &str) -> Result<&Body> {
        match &self.body {
            Some(body) if body.has_part(part) => Ok(body),
            _ => Err(Error::InvalidContainer(format!(
                "{} body part {}",
                self.id, part
            ))),
        }
    }

    /// Status flags of one body part
    pub fn body_part(&mut self, part: &str) -> Result<ListElement<'_>> {
        let spec = self.part_body(part)?.status_spec(part);
        Ok(ListElement::attach(&mut self.attributes, spec))
    }

    /// Cached damage reduction of one body part
    pub fn body_part_armor(&mut self, part: &str) -> Result<ListElement<'_>> {
        let spec = self.part_body(part)?.armor_spec(part);
        Ok(ListElement::attach(&mut self.nattributes, spec))
    }

    /// Named part, or a random one when `part` is `None`
    pub fn get_body_part(
        &mut self,
        part: Option<&str>,
        rng: &mut GameRng,
    ) -> Result<(String, ListElement<'_>)> {
        let name = match part {
            Some(name) => name.to_string(),
            None => self
                .body
                .as_ref()
                .and_then(|body| body.random_part(rng))
                .map(str::to_string)
                .ok_or_else(|| Error::InvalidContainer(format!("{} has no body parts", self.id)))?,
        };
        let table = self.body_part(&name)?;
        Ok((name, table))
    }

    /// Replace one part's cached damage reduction
    pub fn cache_part_dr<I, K>(&mut self, part: &str, ratings: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, Value)>,
        K: AsRef<str>,
    {
        let mut armor = self.body_part_armor(part)?;
        armor.delete();
        for (damage_type, rating) in ratings {
            armor.set_key(damage_type.as_ref(), rating)?;
        }
        Ok(())
    }

    /// Drop every part's cached damage reduction
    pub fn clear_dr_cache(&mut self) {
        let parts = match &self.body {
            Some(body) => body.parts().to_vec(),
            None => return,
        };
        for part in parts {
            if let Ok(mut armor) = self.body_part_armor(&part) {
                armor.delete();
            }
        }
    }

    pub fn condition(&mut self, condition: &str) -> Result<bool> {
        self.table("conditions")?.flag(condition)
    }

    pub fn set_condition(&mut self, condition: &str, on: bool) -> Result<()> {
        self.table("conditions")?.set_key(condition, on)
    }

    /// `hp` dropping through its breakpoint knocks the entity out, rising
    /// back wakes it, and hitting the minimum kills it.
    pub fn install_vital_hooks(&mut self) {
        fn flag(entity: &mut Entity, condition: &str, on: bool) {
            if let Err(err) = entity.set_condition(condition, on) {
                tracing::warn!(entity = %entity.id, %err, "vital hook could not update conditions");
            }
        }

        self.set_hooks(
            "hp",
            ElementHooks::new()
                .on_descending(|e| flag(e, "unconscious", true))
                .on_ascending(|e| flag(e, "unconscious", false))
                .on_min(|e| flag(e, "dead", true)),
        );
    }
}

/// Owner of every entity in a world
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStore {
    entities: IndexMap<EntityId, Entity>,
    next_id: u64,
    by_kind: IndexMap<DefId, Vec<EntityId>>,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new entity and add it to the store
    pub fn create(&mut self, name: impl Into<String>, kind: impl Into<DefId>) -> &mut Entity {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        let kind = kind.into();
        self.by_kind.entry(kind.clone()).or_default().push(id);
        self.entities
            .entry(id)
            .or_insert_with(|| Entity::new(id, name, kind))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.shift_remove(&id)?;
        if let Some(ids) = self.by_kind.get_mut(&entity.kind) {
            ids.retain(|&eid| eid != id);
        }
        Some(entity)
    }

    /// Entities created with the given kind, in creation order
    pub fn by_kind(&self, kind: &DefId) -> impl Iterator<Item = &Entity> {
        let entities = &self.entities;
        self.by_kind
            .get(kind)
            .into_iter()
            .flat_map(move |ids| ids.iter().filter_map(move |id| entities.get(id)))
    }

    /// First entity whose name matches, ignoring ASCII case
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.values().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Display name of an entity, falling back to its id
    pub fn name_of(&self, id: EntityId) -> String {
        self.get(id)
            .map(|e| e.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
