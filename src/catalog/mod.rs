//! Habit categories and habits, predefined or user-owned.

mod repository;
pub mod seed;

pub use repository::*;

use serde::{Deserialize, Serialize};

/// Category as saved on database.
///
/// Predefined categories carry no owner; custom ones belong to exactly one
/// user and are cascade-deleted with them.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
    pub is_custom: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

/// Habit as saved on database.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct Habit {
    pub habit_id: i64,
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    pub habit_name: String,
    pub is_custom: bool,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Habit {
    /// Whether this habit is a custom one owned by the given user.
    pub fn owned_by(&self, user_id: i64) -> bool {
        self.is_custom && self.user_id == Some(user_id)
    }

    /// Whether the given user may see this habit: predefined habits are
    /// visible to everyone, custom ones only to their owner.
    pub fn visible_to(&self, user_id: i64) -> bool {
        !self.is_custom || self.user_id == Some(user_id)
    }
}
