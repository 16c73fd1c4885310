//! XP and level calculation
//!
//! Levels are fixed 100 XP bands. The level is always derived from total XP,
//! never incremented on its own.

use serde::Serialize;

/// XP width of every level band
pub const XP_PER_LEVEL: u64 = 100;

/// Level reached with the given total XP
pub fn level_for_xp(xp: u64) -> u32 {
    u32::try_from(xp / XP_PER_LEVEL)
        .unwrap_or(u32::MAX)
        .saturating_add(1)
}

/// Result of granting XP
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpAward {
    pub new_xp: u64,
    pub new_level: u32,
    pub leveled_up: bool,
}

/// Grant `amount` XP on top of `current_xp`
///
/// `current_level` is only used to detect a level-up; the new level comes from
/// the new XP total alone.
pub fn award_xp(current_xp: u64, current_level: u32, amount: u64) -> XpAward {
    debug_assert!(amount > 0, "XP awards must be positive");
    let new_xp = current_xp.saturating_add(amount);
    let new_level = level_for_xp(new_xp);
    XpAward {
        new_xp,
        new_level,
        leveled_up: new_level > current_level,
    }
}

/// Position of a user inside their current level band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgress {
    pub level: u32,
    pub xp_into_level: u64,
    pub xp_to_next_level: u64,
}

impl LevelProgress {
    pub fn for_xp(xp: u64) -> Self {
        let xp_into_level = xp % XP_PER_LEVEL;
        Self {
            level: level_for_xp(xp),
            xp_into_level,
            xp_to_next_level: XP_PER_LEVEL - xp_into_level,
        }
    }

    /// Progress to next level (0.0 - 1.0)
    pub fn progress_to_next(&self) -> f32 {
        self.xp_into_level as f32 / XP_PER_LEVEL as f32
    }
}
