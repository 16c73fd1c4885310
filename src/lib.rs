//! taskxp - gamification for task lists
//!
//! Turns user actions into durable progression: completing a task or a daily
//! challenge grants XP, which drives the user's level. Task completions also
//! extend a daily streak and can unlock badges.
//!
//! ## Guarantees
//!
//! - A user's level is derived from XP as `xp / 100 + 1`; the stored level
//!   is written in the same statement as the XP it comes from.
//! - Each completion commits as one transaction. A failed completion leaves
//!   no partial award and can be retried.
//! - Completing the same task or challenge twice never awards twice, even
//!   when the calls race.
//! - Badges are unlocked at most once per user.
//!
//! The engine talks to storage through the traits in [`store`];
//! [`store::SqliteStore`] implements all of them.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod gamification;
pub mod store;

pub use engine::{ChallengeCompletionOutcome, GamificationEngine, TaskCompletion};
pub use error::{EngineError, StoreError};
