//! Selection ledger: which habits a user follows, under which display name.

mod repository;

pub use repository::*;

use serde::{Deserialize, Serialize};

/// Ledger entry as saved on database.
///
/// At most one entry exists per (user, habit) pair.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct SelectionEntry {
    pub entry_id: i64,
    pub user_id: i64,
    pub habit_id: i64,
    pub date_added: chrono::NaiveDate,
    pub custom_name: Option<String>,
    pub is_daily_task: bool,
    pub order_position: Option<i32>,
}

impl SelectionEntry {
    /// Whether the entry carries a non-empty display override.
    pub fn has_override(&self) -> bool {
        self.custom_name.as_deref().is_some_and(|name| !name.is_empty())
    }
}

/// Outcome of removing a habit from a user's selection.
///
/// Resolved once from the habit's origin and the entry's override, then
/// applied; both the data mutation and the user-facing message follow from
/// the chosen variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Removal {
    /// The habit is custom and owned by the caller: the habit row itself is
    /// deleted, ledger and status rows cascade away with it.
    DeleteCustomHabit,
    /// The entry carried a display override: only the entry is deleted and
    /// the predefined habit reverts to its default name for this user.
    RevertToPredefined,
    /// Plain un-adoption: only the entry is deleted.
    Unselect,
}

impl Removal {
    /// Decision table over (habit is custom, caller owns it, entry has a
    /// non-empty override), in precedence order.
    pub fn resolve(
        is_custom: bool,
        owner_match: bool,
        has_override: bool,
    ) -> Self {
        match (is_custom, owner_match, has_override) {
            (true, true, true) => Self::DeleteCustomHabit,
            (true, true, false) => Self::DeleteCustomHabit,
            (true, false, true) => Self::RevertToPredefined,
            (true, false, false) => Self::Unselect,
            (false, _, true) => Self::RevertToPredefined,
            (false, _, false) => Self::Unselect,
        }
    }

    /// Message surfaced to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            Self::DeleteCustomHabit => "Custom habit deleted permanently.",
            Self::RevertToPredefined => "Habit reverted to predefined.",
            Self::Unselect => "Habit removed from my habits.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_table() {
        use Removal::*;

        // (is_custom, owner_match, has_override) -> outcome.
        let table = [
            (true, true, true, DeleteCustomHabit),
            (true, true, false, DeleteCustomHabit),
            (true, false, true, RevertToPredefined),
            (true, false, false, Unselect),
            (false, true, true, RevertToPredefined),
            (false, true, false, Unselect),
            (false, false, true, RevertToPredefined),
            (false, false, false, Unselect),
        ];

        for (is_custom, owner_match, has_override, outcome) in table {
            assert_eq!(
                Removal::resolve(is_custom, owner_match, has_override),
                outcome,
                "({is_custom}, {owner_match}, {has_override})"
            );
        }
    }

    #[test]
    fn test_messages_are_distinct() {
        let messages = [
            Removal::DeleteCustomHabit.message(),
            Removal::RevertToPredefined.message(),
            Removal::Unselect.message(),
        ];

        assert_eq!(
            messages.len(),
            messages.iter().collect::<std::collections::HashSet<_>>().len()
        );
    }

    #[test]
    fn test_empty_override_is_no_override() {
        let mut entry = SelectionEntry::default();
        assert!(!entry.has_override());

        entry.custom_name = Some(String::new());
        assert!(!entry.has_override());

        entry.custom_name = Some("Morning Hydration".into());
        assert!(entry.has_override());
    }
}
