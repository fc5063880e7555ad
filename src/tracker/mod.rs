//! Daily status tracker: one status row per user, habit and calendar day.

mod repository;

pub use repository::*;

use serde::{Deserialize, Serialize};

/// Completion status of a habit on a given day.
///
/// `Missed` and `Skipped` are valid states but no operation sets them; they
/// stay reachable only through direct data manipulation.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    sqlx::Type,
)]
#[sqlx(type_name = "task_status")]
pub enum TaskStatus {
    #[default]
    Pending,
    Completed,
    Missed,
    Skipped,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "Pending"),
            TaskStatus::Completed => write!(f, "Completed"),
            TaskStatus::Missed => write!(f, "Missed"),
            TaskStatus::Skipped => write!(f, "Skipped"),
        }
    }
}

/// Status row as saved on database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DailyStatus {
    pub status_id: i64,
    pub user_id: i64,
    pub habit_id: i64,
    pub task_date: chrono::NaiveDate,
    pub status: TaskStatus,
    pub marked_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// One line of the "my habits" board for a given day.
///
/// `name` honors the user's display override when one is set.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct BoardEntry {
    pub habit_id: i64,
    pub name: String,
    pub category_name: String,
    pub status: TaskStatus,
    pub marked_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serde() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::Completed).unwrap(),
            r#""Completed""#
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>(r#""Skipped""#).unwrap(),
            TaskStatus::Skipped
        );
        assert!(serde_json::from_str::<TaskStatus>(r#""Done""#).is_err());
    }

    #[test]
    fn test_status_display_matches_serde() {
        for status in [
            TaskStatus::Pending,
            TaskStatus::Completed,
            TaskStatus::Missed,
            TaskStatus::Skipped,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{status}\""));
        }
    }

    #[test]
    fn test_default_is_pending() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
    }
}
