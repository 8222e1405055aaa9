//! Keyed table definitions (damage types, conditions, part statuses)

use umud_core::{DefId, ListElementSpec};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDef {
    pub id: DefId,
    pub keys: Vec<String>,
    /// Boolean flags instead of numeric counters
    #[serde(default)]
    pub flags: bool,
}

impl TableDef {
    /// Spec for a table stored under the definition's own id
    pub fn spec(&self) -> ListElementSpec {
        self.spec_named(self.id.as_str())
    }

    pub fn spec_named(&self, name: &str) -> ListElementSpec {
        if self.flags {
            ListElementSpec::flags(name, self.keys.iter().cloned())
        } else {
            ListElementSpec::counters(name, self.keys.iter().cloned())
        }
    }
}
