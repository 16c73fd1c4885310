//! Gamification rules: XP levels, daily streaks and badges
//!
//! Everything here except [`BadgeEvaluator`] is pure and synchronous.

pub mod badges;
pub mod clock;
pub mod levels;
pub mod streaks;

pub use badges::{BadgeCatalog, BadgeDefinition, BadgeEvaluator, DEFAULT_BADGES, UserStats};
pub use clock::{Clock, FixedClock, SystemClock};
pub use levels::{LevelProgress, XP_PER_LEVEL, XpAward, award_xp, level_for_xp};
pub use streaks::{StreakUpdate, activity_day, update_streak};
