//! Concrete entity kinds: players, monsters and pets

use super::{ActiveBuff, BuffLedger, Entity, SkillBar};
use crate::types::{AttrId, BuffId, BuffTag, EntityKind, SkillBarId, WorldPosition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// TOML table keys are strings; attribute ids are parsed from them
mod attribute_keys {
    use crate::types::AttrId;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::HashMap;

    pub fn serialize<S: Serializer>(
        attributes: &HashMap<AttrId, f64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_map(attributes.iter().map(|(id, value)| (id.to_string(), value)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<AttrId, f64>, D::Error> {
        let raw = HashMap::<String, f64>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, value)| {
                key.trim()
                    .parse::<AttrId>()
                    .map(|id| (id, value))
                    .map_err(|_| D::Error::custom(format!("invalid attribute id `{}`", key)))
            })
            .collect()
    }
}

/// State shared by every entity kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityState {
    /// Attribute values keyed by attribute id
    #[serde(default, with = "attribute_keys")]
    pub attributes: HashMap<AttrId, f64>,
    #[serde(default)]
    pub buffs: BuffLedger,
    #[serde(default)]
    pub position: WorldPosition,
}

impl EntityState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, attr_id: AttrId, value: f64) -> Self {
        self.attributes.insert(attr_id, value);
        self
    }

    pub fn with_buff(mut self, buff: ActiveBuff) -> Self {
        self.buffs.add(buff);
        self
    }

    pub fn with_position(mut self, position: WorldPosition) -> Self {
        self.position = position;
        self
    }

    fn attribute(&self, attr_id: AttrId) -> Option<f64> {
        self.attributes.get(&attr_id).copied()
    }
}

/// A player character
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(flatten)]
    pub state: EntityState,
    /// Skill bars in display order
    #[serde(default)]
    pub skill_bars: Vec<SkillBar>,
}

impl Player {
    pub fn new(state: EntityState) -> Self {
        Player {
            state,
            skill_bars: Vec::new(),
        }
    }

    /// Add a skill bar, replacing any bar with the same id
    pub fn with_skill_bar(mut self, bar: SkillBar) -> Self {
        self.skill_bars.retain(|b| b.bar_id != bar.bar_id);
        self.skill_bars.push(bar);
        self
    }
}

impl Entity for Player {
    fn kind(&self) -> EntityKind {
        EntityKind::Player
    }

    fn attribute(&self, attr_id: AttrId) -> Option<f64> {
        self.state.attribute(attr_id)
    }

    fn buff_count(&self, buff_id: BuffId) -> i64 {
        self.state.buffs.count(buff_id)
    }

    fn buff_count_by_tag(&self, tag: BuffTag) -> i64 {
        self.state.buffs.count_by_tag(tag)
    }

    fn buff_left_time(&self, buff_id: BuffId) -> i64 {
        self.state.buffs.left_time(buff_id)
    }

    fn buff_interval(&self, buff_id: BuffId) -> i64 {
        self.state.buffs.interval(buff_id)
    }

    fn world_position(&self) -> WorldPosition {
        self.state.position
    }

    fn skill_bar(&self, bar_id: SkillBarId) -> Option<&SkillBar> {
        self.skill_bars.iter().find(|b| b.bar_id == bar_id)
    }
}

/// A monster spawned from a monster table row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Monster {
    #[serde(flatten)]
    pub state: EntityState,
    /// Monster type from the monster table (boss, elite, ...)
    #[serde(default)]
    pub configured_type: i32,
}

impl Monster {
    pub fn new(state: EntityState, configured_type: i32) -> Self {
        Monster {
            state,
            configured_type,
        }
    }
}

impl Entity for Monster {
    fn kind(&self) -> EntityKind {
        EntityKind::Monster
    }

    fn attribute(&self, attr_id: AttrId) -> Option<f64> {
        self.state.attribute(attr_id)
    }

    fn buff_count(&self, buff_id: BuffId) -> i64 {
        self.state.buffs.count(buff_id)
    }

    fn buff_count_by_tag(&self, tag: BuffTag) -> i64 {
        self.state.buffs.count_by_tag(tag)
    }

    fn buff_left_time(&self, buff_id: BuffId) -> i64 {
        self.state.buffs.left_time(buff_id)
    }

    fn buff_interval(&self, buff_id: BuffId) -> i64 {
        self.state.buffs.interval(buff_id)
    }

    fn world_position(&self) -> WorldPosition {
        self.state.position
    }

    fn configured_type(&self) -> Option<i32> {
        Some(self.configured_type)
    }
}

/// A pet following a player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    #[serde(flatten)]
    pub state: EntityState,
}

impl Pet {
    pub fn new(state: EntityState) -> Self {
        Pet { state }
    }
}

impl Entity for Pet {
    fn kind(&self) -> EntityKind {
        EntityKind::Pet
    }

    fn attribute(&self, attr_id: AttrId) -> Option<f64> {
        self.state.attribute(attr_id)
    }

    fn buff_count(&self, buff_id: BuffId) -> i64 {
        self.state.buffs.count(buff_id)
    }

    fn buff_count_by_tag(&self, tag: BuffTag) -> i64 {
        self.state.buffs.count_by_tag(tag)
    }

    fn buff_left_time(&self, buff_id: BuffId) -> i64 {
        self.state.buffs.left_time(buff_id)
    }

    fn buff_interval(&self, buff_id: BuffId) -> i64 {
        self.state.buffs.interval(buff_id)
    }

    fn world_position(&self) -> WorldPosition {
        self.state.position
    }
}
