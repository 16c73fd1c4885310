//! Core domain types for taskxp

mod badge;
mod challenge;
mod task;
mod user;

pub use badge::{Badge, BadgeCondition, BadgeId, BadgeUnlock};
pub use challenge::{Challenge, ChallengeCompletion, ChallengeId};
pub use task::{Task, TaskId};
pub use user::{User, UserId};
