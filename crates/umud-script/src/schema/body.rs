//! Body layout definitions

use umud_core::{BodyLayout, DefId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDef {
    pub id: DefId,
    pub parts: Vec<String>,
}

impl BodyDef {
    pub fn layout(&self) -> BodyLayout {
        BodyLayout::new(self.id.as_str(), self.parts.iter().cloned())
    }
}
