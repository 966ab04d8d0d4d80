//! BuffLedger - Buffs currently active on an entity

use crate::types::{BuffId, BuffTag};
use serde::{Deserialize, Serialize};

/// A buff instance active on an entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveBuff {
    /// Buff identifier
    pub buff_id: BuffId,
    /// Labels this buff is grouped under
    #[serde(default)]
    pub tags: Vec<BuffTag>,
    /// Current stack count
    #[serde(default = "default_stacks")]
    pub stacks: u32,
    /// Remaining time in milliseconds
    #[serde(default)]
    pub left_time: i64,
    /// Tick interval in milliseconds (0 for non-ticking buffs)
    #[serde(default)]
    pub interval: i64,
}

fn default_stacks() -> u32 {
    1
}

impl ActiveBuff {
    /// Create a single-stack buff
    pub fn new(buff_id: BuffId, left_time: i64) -> Self {
        ActiveBuff {
            buff_id,
            tags: Vec::new(),
            stacks: 1,
            left_time,
            interval: 0,
        }
    }

    /// Add a tag to this buff
    pub fn with_tag(mut self, tag: BuffTag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Set the number of stacks
    pub fn with_stacks(mut self, stacks: u32) -> Self {
        self.stacks = stacks;
        self
    }

    /// Set the tick interval
    pub fn with_interval(mut self, interval: i64) -> Self {
        self.interval = interval;
        self
    }

    pub fn has_tag(&self, tag: BuffTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// Buffs owned by one entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuffLedger {
    buffs: Vec<ActiveBuff>,
}

impl BuffLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a buff. A buff with the same id merges stacks and keeps the longer duration.
    pub fn add(&mut self, buff: ActiveBuff) {
        if let Some(existing) = self.buffs.iter_mut().find(|b| b.buff_id == buff.buff_id) {
            existing.stacks += buff.stacks;
            existing.left_time = existing.left_time.max(buff.left_time);
            for tag in buff.tags {
                if !existing.tags.contains(&tag) {
                    existing.tags.push(tag);
                }
            }
        } else {
            self.buffs.push(buff);
        }
    }

    pub fn with_buff(mut self, buff: ActiveBuff) -> Self {
        self.add(buff);
        self
    }

    pub fn get(&self, buff_id: BuffId) -> Option<&ActiveBuff> {
        self.buffs.iter().find(|b| b.buff_id == buff_id)
    }

    /// Stack count of a buff (0 if not active)
    pub fn count(&self, buff_id: BuffId) -> i64 {
        self.get(buff_id).map(|b| i64::from(b.stacks)).unwrap_or(0)
    }

    /// Total stacks across all buffs carrying `tag`
    pub fn count_by_tag(&self, tag: BuffTag) -> i64 {
        self.buffs
            .iter()
            .filter(|b| b.has_tag(tag))
            .map(|b| i64::from(b.stacks))
            .sum()
    }

    /// Remaining time of a buff in milliseconds (0 if not active)
    pub fn left_time(&self, buff_id: BuffId) -> i64 {
        self.get(buff_id).map(|b| b.left_time.max(0)).unwrap_or(0)
    }

    /// Tick interval of a buff in milliseconds (0 if not active)
    pub fn interval(&self, buff_id: BuffId) -> i64 {
        self.get(buff_id).map(|b| b.interval).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }
}
