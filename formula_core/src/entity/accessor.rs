//! Entity accessor - Total reads over optional entity handles
//!
//! Every read saturates to a neutral value: an absent entity, an unset
//! attribute and an attribute equal to zero all read as `0`. Formulas cannot
//! tell these apart and must not try.

use super::Entity;
use crate::types::{AttrId, BuffId, BuffTag, EntityKind, SkillBarId};

/// Attribute value, 0 when the entity is absent or the attribute is unset, zero or NaN
///
/// Infinite values are returned as-is.
pub fn attribute_value(entity: Option<&dyn Entity>, attr_id: AttrId) -> f64 {
    entity
        .and_then(|e| e.attribute(attr_id))
        .filter(|v| !v.is_nan() && *v != 0.0)
        .unwrap_or(0.0)
}

/// Kind of the entity, [`EntityKind::None`] when absent
pub fn entity_kind(entity: Option<&dyn Entity>) -> EntityKind {
    entity.map(|e| e.kind()).unwrap_or(EntityKind::None)
}

/// Configured monster type, 0 for anything that is not a monster
pub fn monster_configured_type(entity: Option<&dyn Entity>) -> i32 {
    match entity {
        Some(e) if e.kind() == EntityKind::Monster => e.configured_type().unwrap_or(0),
        _ => 0,
    }
}

pub fn buff_count(entity: Option<&dyn Entity>, buff_id: BuffId) -> i64 {
    entity.map(|e| e.buff_count(buff_id)).unwrap_or(0)
}

pub fn buff_count_by_tag(entity: Option<&dyn Entity>, tag: BuffTag) -> i64 {
    entity.map(|e| e.buff_count_by_tag(tag)).unwrap_or(0)
}

pub fn buff_left_time(entity: Option<&dyn Entity>, buff_id: BuffId) -> i64 {
    entity.map(|e| e.buff_left_time(buff_id)).unwrap_or(0)
}

pub fn buff_interval(entity: Option<&dyn Entity>, buff_id: BuffId) -> i64 {
    entity.map(|e| e.buff_interval(buff_id)).unwrap_or(0)
}

/// Count used (`want_used = true`) or empty skill slots on a skill bar
///
/// Only players are counted. Monsters and pets always report 0.
pub fn available_skill_slots(
    entity: Option<&dyn Entity>,
    bar_id: SkillBarId,
    want_used: bool,
) -> i64 {
    let Some(entity) = entity else {
        return 0;
    };

    match entity.kind() {
        EntityKind::Player => entity
            .skill_bar(bar_id)
            .map(|bar| bar.count_slots(want_used))
            .unwrap_or(0),
        // TODO: monster skill bars have no counting rule yet; pending design review
        EntityKind::Monster => 0,
        EntityKind::Pet | EntityKind::None => 0,
    }
}

/// Distance between two entities, rounded up; 0 if either is absent
pub fn distance(from: Option<&dyn Entity>, to: Option<&dyn Entity>) -> i64 {
    match (from, to) {
        (Some(a), Some(b)) => a.world_position().distance_to(&b.world_position()).ceil() as i64,
        _ => 0,
    }
}
