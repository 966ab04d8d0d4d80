//! Core identifiers and value types shared by formulas and entities

use serde::{Deserialize, Serialize};

/// Stable id naming one hit-rate/damage formula pair
pub type FormulaId = u32;

/// Integer tag partitioning a damage result (physical, elemental, ...)
pub type CombatType = i32;

/// Attribute id as authored in the attribute tables
pub type AttrId = u32;

/// Buff id as authored in the buff tables
pub type BuffId = u32;

/// Buff label shared by a family of buffs
pub type BuffTag = u32;

/// Skill bar id on a player
pub type SkillBarId = u32;

/// Integer damage amount written into a combat context
pub type Amount = i64;

/// Full probability / ratio scale, in basis points
pub const BASIS_POINTS: i64 = 10_000;

/// Attribute ids read by the built-in formulas
pub mod attr {
    use super::AttrId;

    /// Attacker base attack
    pub const ATTACK: AttrId = 10007;
    /// Target evasion, in basis points
    pub const EVASION: AttrId = 10065;
}

/// Combat types written by the built-in formulas
pub mod combat_type {
    use super::CombatType;

    /// Primary (direct hit) damage
    pub const PRIMARY: CombatType = 10001;
}

/// Discriminant for the concrete kind behind an entity handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// No entity (absent handle)
    #[default]
    None,
    Player,
    Monster,
    Pet,
}

impl EntityKind {
    /// Numeric code used by the designer tables (0 none, 1 player, 2 monster, 3 pet)
    pub fn code(self) -> i32 {
        match self {
            EntityKind::None => 0,
            EntityKind::Player => 1,
            EntityKind::Monster => 2,
            EntityKind::Pet => 3,
        }
    }
}

/// Position in world space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl WorldPosition {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        WorldPosition { x, y, z }
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: &WorldPosition) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}
