//! Player skill bars

use crate::types::SkillBarId;
use serde::{Deserialize, Serialize};

/// One slot on a skill bar; skill id 0 marks an empty slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillSlot {
    #[serde(default)]
    pub skill_id: u32,
}

impl SkillSlot {
    pub fn empty() -> Self {
        SkillSlot { skill_id: 0 }
    }

    pub fn with_skill(skill_id: u32) -> Self {
        SkillSlot { skill_id }
    }

    pub fn is_used(&self) -> bool {
        self.skill_id != 0
    }
}

/// Ordered list of skill slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillBar {
    pub bar_id: SkillBarId,
    #[serde(default)]
    pub slots: Vec<SkillSlot>,
}

impl SkillBar {
    pub fn new(bar_id: SkillBarId, slots: Vec<SkillSlot>) -> Self {
        SkillBar { bar_id, slots }
    }

    /// Build a bar from raw skill ids (0 = empty)
    pub fn from_skill_ids(bar_id: SkillBarId, skill_ids: &[u32]) -> Self {
        SkillBar {
            bar_id,
            slots: skill_ids.iter().map(|&id| SkillSlot::with_skill(id)).collect(),
        }
    }

    /// Count used slots (`used = true`) or empty slots (`used = false`)
    pub fn count_slots(&self, used: bool) -> i64 {
        self.slots.iter().filter(|s| s.is_used() == used).count() as i64
    }
}
