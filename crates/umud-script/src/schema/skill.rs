//! Skill definitions

use umud_core::DefId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rated 1 (very easy) to 5 (daunting)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Difficulty(pub u8);

impl Difficulty {
    pub fn label(&self) -> &'static str {
        match self.0 {
            0 | 1 => "very easy",
            2 => "easy",
            3 => "moderate",
            4 => "hard",
            _ => "daunting",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A learnable skill and the set that grants it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDef {
    pub id: DefId,
    pub set: DefId,
    pub learn_diff: Difficulty,
    pub comp_diff: Difficulty,
}

impl SkillDef {
    /// Seconds of study for one rank: `base` per point of learning difficulty
    pub fn study_time(&self, base: f64) -> f64 {
        base * f64::from(self.learn_diff.0.max(1))
    }

    /// Cell that tracks this skill's rank
    pub fn rank_cell(&self) -> String {
        format!("{}_rank", self.id)
    }
}
