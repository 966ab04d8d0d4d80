//! Entity - Read-only capability interface over simulation entities
//!
//! The surrounding simulation owns its entities. Formulas only ever see them
//! through [`Entity`], and normally through the free functions in
//! [`accessor`], which turn an absent entity or unset attribute into a zero.

pub mod accessor;
mod buff;
mod kinds;
mod skill_bar;

pub use accessor::{
    attribute_value, available_skill_slots, buff_count, buff_count_by_tag, buff_interval,
    buff_left_time, distance, entity_kind, monster_configured_type,
};
pub use buff::{ActiveBuff, BuffLedger};
pub use kinds::{EntityState, Monster, Pet, Player};
pub use skill_bar::{SkillBar, SkillSlot};

use crate::types::{AttrId, BuffId, BuffTag, EntityKind, SkillBarId, WorldPosition};

/// Trait for anything formulas can read combat state from
pub trait Entity: Send + Sync {
    /// Concrete kind of this entity
    fn kind(&self) -> EntityKind;

    /// Raw attribute value, `None` if unset
    fn attribute(&self, attr_id: AttrId) -> Option<f64>;

    /// Stacks of a buff currently on the entity
    fn buff_count(&self, buff_id: BuffId) -> i64;

    /// Total stacks of buffs carrying a tag
    fn buff_count_by_tag(&self, tag: BuffTag) -> i64;

    /// Remaining buff time in milliseconds
    fn buff_left_time(&self, buff_id: BuffId) -> i64;

    /// Buff tick interval in milliseconds
    fn buff_interval(&self, buff_id: BuffId) -> i64;

    fn world_position(&self) -> WorldPosition;

    /// Configured monster type; only monsters carry one
    fn configured_type(&self) -> Option<i32> {
        None
    }

    /// Named skill bar; only players carry them
    fn skill_bar(&self, _bar_id: SkillBarId) -> Option<&SkillBar> {
        None
    }
}
