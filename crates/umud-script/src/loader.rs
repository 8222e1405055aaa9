//! RON rule loader

use crate::error::{Error, Result};
use crate::schema::body::BodyDef;
use crate::schema::entity::EntityTypeDef;
use crate::schema::skill::SkillDef;
use crate::schema::table::TableDef;
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt::Display;
use std::fs;
use std::hash::Hash;
use std::path::Path;
use umud_core::{
    Body, DefId, EntityTemplate, SchedulerConfig, StatusKind, StatusKindConfig,
};

/// The rules shipped with the crate
pub const STANDARD_RULES: &str = include_str!("../rules/standard.ron");

/// One rule file; every section is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RuleFile {
    status_kinds: Vec<StatusKindConfig>,
    tables: Vec<TableDef>,
    bodies: Vec<BodyDef>,
    entity_types: Vec<EntityTypeDef>,
    skills: Vec<SkillDef>,
}

/// Loaded rule definitions
#[derive(Debug, Default, Clone)]
pub struct RuleSet {
    pub status_kinds: IndexMap<StatusKind, StatusKindConfig>,
    pub tables: IndexMap<DefId, TableDef>,
    pub bodies: IndexMap<DefId, BodyDef>,
    pub entity_types: IndexMap<DefId, EntityTypeDef>,
    pub skills: IndexMap<DefId, SkillDef>,
}

impl RuleSet {
    /// Parse [`STANDARD_RULES`]
    pub fn standard() -> Result<Self> {
        let mut loader = Loader::new();
        loader.load_str(STANDARD_RULES)?;
        loader.finish()
    }

    /// Scheduler configuration; the standard kinds if none were loaded
    pub fn scheduler_config(&self) -> SchedulerConfig {
        if self.status_kinds.is_empty() {
            return SchedulerConfig::standard();
        }
        SchedulerConfig::new(self.status_kinds.values().cloned().collect())
    }

    pub fn table(&self, id: &DefId) -> Option<&TableDef> {
        self.tables.get(id)
    }

    pub fn body(&self, id: &DefId) -> Option<&BodyDef> {
        self.bodies.get(id)
    }

    pub fn entity_type(&self, id: &DefId) -> Option<&EntityTypeDef> {
        self.entity_types.get(id)
    }

    pub fn skill(&self, id: &DefId) -> Option<&SkillDef> {
        self.skills.get(id)
    }

    /// Skills granted by one skill set
    pub fn skills_in<'a>(&'a self, set: &'a DefId) -> impl Iterator<Item = &'a SkillDef> {
        self.skills.values().filter(move |s| &s.set == set)
    }

    fn table_ref(&self, id: &DefId, user: &str) -> Result<&TableDef> {
        self.tables
            .get(id)
            .ok_or_else(|| Error::UnknownReference(format!("{} uses table {}", user, id)))
    }

    /// Build the template for an entity type
    pub fn template(&self, id: &DefId) -> Result<EntityTemplate> {
        let def = self
            .entity_types
            .get(id)
            .ok_or_else(|| Error::UnknownReference(format!("entity type {}", id)))?;
        let user = format!("entity type {}", id);

        let tables = def
            .tables
            .iter()
            .map(|table| self.table_ref(table, &user).map(TableDef::spec))
            .collect::<Result<Vec<_>>>()?;

        let body = match &def.body {
            Some(body) => {
                let layout = self.bodies.get(&body.layout).ok_or_else(|| {
                    Error::UnknownReference(format!("{} uses body {}", user, body.layout))
                })?;
                let status = self.table_ref(&body.status, &user)?;
                let armor = self.table_ref(&body.armor, &user)?;
                Some(Body::new(
                    layout.layout(),
                    status.spec_named("part"),
                    armor.spec_named("dr"),
                ))
            }
            None => None,
        };

        Ok(EntityTemplate {
            elements: def.elements.clone(),
            tables,
            body,
            vitals: def.vitals,
        })
    }

    /// Check names, cross references and value ranges
    pub fn validate(&self) -> Result<()> {
        let blank_kind = self.status_kinds.keys().any(|k| k.as_str().trim().is_empty());
        let blank_def = self
            .tables
            .keys()
            .chain(self.bodies.keys())
            .chain(self.entity_types.keys())
            .chain(self.skills.keys())
            .any(DefId::is_blank);
        if blank_kind || blank_def {
            return Err(Error::InvalidSchema("blank identifier".to_string()));
        }
        for table in self.tables.values() {
            if table.keys.is_empty() {
                return Err(Error::InvalidSchema(format!("table {} has no keys", table.id)));
            }
        }
        for body in self.bodies.values() {
            if body.parts.is_empty() {
                return Err(Error::InvalidSchema(format!("body {} has no parts", body.id)));
            }
        }
        for def in self.entity_types.values() {
            for spec in &def.elements {
                if spec.min > spec.max || spec.value < spec.min || spec.value > spec.max {
                    return Err(Error::InvalidSchema(format!(
                        "entity type {} cell {} has default {} outside [{}, {}]",
                        def.id, spec.name, spec.value, spec.min, spec.max
                    )));
                }
            }
            self.template(&def.id)?;
            if def.vitals {
                let conditions = def
                    .tables
                    .iter()
                    .filter_map(|t| self.tables.get(t))
                    .find(|t| t.id.as_str() == "conditions");
                let wired = conditions.is_some_and(|t| {
                    t.keys.iter().any(|k| k == "unconscious") && t.keys.iter().any(|k| k == "dead")
                });
                if !wired {
                    return Err(Error::InvalidSchema(format!(
                        "entity type {} has vitals but no conditions table with unconscious and dead",
                        def.id
                    )));
                }
            }
        }
        Ok(())
    }
}

fn insert_unique<K, V>(map: &mut IndexMap<K, V>, key: K, value: V) -> Result<()>
where
    K: Hash + Eq + Display,
{
    if map.contains_key(&key) {
        return Err(Error::DuplicateDefinition(key.to_string()));
    }
    map.insert(key, value);
    Ok(())
}

/// Loader for RON rule files
pub struct Loader {
    rules: RuleSet,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            rules: RuleSet::default(),
        }
    }

    /// Load rules from a RON string
    pub fn load_str(&mut self, content: &str) -> Result<()> {
        let file: RuleFile = ron::from_str(content)?;
        for kind in file.status_kinds {
            insert_unique(&mut self.rules.status_kinds, kind.name.clone(), kind)?;
        }
        for table in file.tables {
            insert_unique(&mut self.rules.tables, table.id.clone(), table)?;
        }
        for body in file.bodies {
            insert_unique(&mut self.rules.bodies, body.id.clone(), body)?;
        }
        for def in file.entity_types {
            insert_unique(&mut self.rules.entity_types, def.id.clone(), def)?;
        }
        for skill in file.skills {
            insert_unique(&mut self.rules.skills, skill.id.clone(), skill)?;
        }
        Ok(())
    }

    /// Load a single RON file
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading rules");
        self.load_str(&content)
    }

    /// Load every `.ron` file under a directory, in name order
    pub fn load_directory(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Not a directory: {:?}", path),
            )));
        }

        let mut entries = fs::read_dir(path)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();

        for file_path in entries {
            if file_path.is_dir() {
                self.load_directory(&file_path)?;
            } else if file_path.extension().is_some_and(|e| e == "ron") {
                self.load_file(&file_path)?;
            }
        }
        Ok(())
    }

    /// Definitions loaded so far
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Validate and return the rule set
    pub fn finish(self) -> Result<RuleSet> {
        self.rules.validate()?;
        Ok(self.rules)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
