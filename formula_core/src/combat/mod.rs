//! Combat context - Mutable state threaded through one formula evaluation

mod context;
mod fight_info;

pub use context::{CombatContext, DAMAGE_EXT_PARAM, DAMAGE_RATE_PARAM};
pub use fight_info::FightInfo;
