//! FightInfo - Side records a formula reports alongside its damage

use serde::{Deserialize, Serialize};

/// One fight info record (crit, block, dodge, ... as named by the fight table)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FightInfo {
    /// Fight table id
    pub fight_id: u32,
    /// Whether the checked event happened
    pub success: bool,
    /// Associated value (chance, amount, ...)
    pub value: f64,
}

impl FightInfo {
    pub fn new(fight_id: u32, success: bool, value: f64) -> Self {
        FightInfo {
            fight_id,
            success,
            value,
        }
    }
}
