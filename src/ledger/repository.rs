//! Handle database requests for the selection ledger.

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::catalog::Habit;
use crate::error::{Result, ServerError};
use crate::ledger::{Removal, SelectionEntry};

const ENTRY_COLUMNS: &str = "entry_id, user_id, habit_id, date_added, custom_name, is_daily_task, order_position";

#[derive(Clone)]
pub struct SelectionRepository {
    pool: Pool<Postgres>,
}

impl SelectionRepository {
    /// Create a new [`SelectionRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Adopt a habit for a user.
    ///
    /// Idempotent: the unique (user, habit) constraint absorbs duplicate
    /// adoption, including racing ones. Returns whether a row was created.
    pub async fn adopt(
        &self,
        user_id: i64,
        habit_id: i64,
        today: NaiveDate,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"INSERT INTO user_selected_habits (user_id, habit_id, date_added)
                VALUES ($1, $2, $3)
                ON CONFLICT (user_id, habit_id) DO NOTHING"#,
        )
        .bind(user_id)
        .bind(habit_id)
        .bind(today)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Set a display override for a habit, adopting it if needed.
    ///
    /// A single upsert: creating uses today's date, updating touches only
    /// the override and leaves the adoption date as it was.
    pub async fn rename(
        &self,
        user_id: i64,
        habit_id: i64,
        today: NaiveDate,
        custom_name: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO user_selected_habits (user_id, habit_id, date_added, custom_name)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (user_id, habit_id)
                DO UPDATE SET custom_name = EXCLUDED.custom_name"#,
        )
        .bind(user_id)
        .bind(habit_id)
        .bind(today)
        .bind(custom_name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find the ledger entry for a (user, habit) pair.
    pub async fn entry(
        &self,
        user_id: i64,
        habit_id: i64,
    ) -> Result<Option<SelectionEntry>> {
        let query = format!(
            r#"SELECT {ENTRY_COLUMNS} FROM user_selected_habits
                WHERE user_id = $1 AND habit_id = $2"#
        );

        let entry = sqlx::query_as::<_, SelectionEntry>(&query)
            .bind(user_id)
            .bind(habit_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(entry)
    }

    /// All ledger entries of a user.
    pub async fn entries(&self, user_id: i64) -> Result<Vec<SelectionEntry>> {
        let query = format!(
            r#"SELECT {ENTRY_COLUMNS} FROM user_selected_habits
                WHERE user_id = $1
                ORDER BY order_position NULLS LAST, entry_id"#
        );

        let entries = sqlx::query_as::<_, SelectionEntry>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(entries)
    }

    /// Remove a habit from a user's selection, resolving the removal branch
    /// first and applying it.
    ///
    /// Deleting the habit row relies on the foreign keys to cascade the
    /// ledger entry and any status rows away.
    pub async fn remove(&self, user_id: i64, habit: &Habit) -> Result<Removal> {
        let entry = self
            .entry(user_id, habit.habit_id)
            .await?
            .ok_or(ServerError::NotFound {
                resource: "selection entry",
            })?;

        let outcome = Removal::resolve(
            habit.is_custom,
            habit.owned_by(user_id),
            entry.has_override(),
        );

        match outcome {
            Removal::DeleteCustomHabit => {
                sqlx::query("DELETE FROM habits WHERE habit_id = $1")
                    .bind(habit.habit_id)
                    .execute(&self.pool)
                    .await?;
            },
            Removal::RevertToPredefined | Removal::Unselect => {
                sqlx::query(
                    r#"DELETE FROM user_selected_habits
                        WHERE user_id = $1 AND habit_id = $2"#,
                )
                .bind(user_id)
                .bind(habit.habit_id)
                .execute(&self.pool)
                .await?;
            },
        }

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogRepository;
    use sqlx::PgPool;

    fn today() -> NaiveDate {
        chrono::Utc::now().date_naive()
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/catalog.sql"))]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_adopt_is_idempotent(pool: PgPool) {
        let ledger = SelectionRepository::new(pool.clone());

        assert!(ledger.adopt(1, 1000, today()).await.unwrap());
        assert!(!ledger.adopt(1, 1000, today()).await.unwrap());

        let entries = ledger.entries(1).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].habit_id, 1000);
        assert!(entries[0].custom_name.is_none());
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/catalog.sql"))]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_rename_preserves_adoption_date(pool: PgPool) {
        let ledger = SelectionRepository::new(pool.clone());

        let yesterday = today().pred_opt().unwrap();
        ledger.adopt(1, 1000, yesterday).await.unwrap();
        ledger.rename(1, 1000, today(), "Morning Hydration").await.unwrap();

        let entry = ledger.entry(1, 1000).await.unwrap().unwrap();
        assert_eq!(entry.date_added, yesterday);
        assert_eq!(entry.custom_name.as_deref(), Some("Morning Hydration"));
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/catalog.sql"))]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_rename_adopts_when_missing(pool: PgPool) {
        let ledger = SelectionRepository::new(pool.clone());

        ledger.rename(1, 1000, today(), "Hydrate!").await.unwrap();

        let entry = ledger.entry(1, 1000).await.unwrap().unwrap();
        assert_eq!(entry.date_added, today());
        assert!(entry.has_override());
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/catalog.sql"))]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_remove_custom_habit_deletes_habit(pool: PgPool) {
        let catalog = CatalogRepository::new(pool.clone());
        let ledger = SelectionRepository::new(pool.clone());

        let habit = catalog.find_habit(1001).await.unwrap().unwrap();
        ledger.adopt(1, 1001, today()).await.unwrap();

        let outcome = ledger.remove(1, &habit).await.unwrap();
        assert_eq!(outcome, Removal::DeleteCustomHabit);
        assert!(catalog.find_habit(1001).await.unwrap().is_none());
        assert!(ledger.entry(1, 1001).await.unwrap().is_none());

        // The habit is gone for good, re-adoption cannot succeed.
        assert!(ledger.adopt(1, 1001, today()).await.is_err());
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/catalog.sql"))]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_remove_renamed_predefined_reverts(pool: PgPool) {
        let catalog = CatalogRepository::new(pool.clone());
        let ledger = SelectionRepository::new(pool.clone());

        let habit = catalog.find_habit(1000).await.unwrap().unwrap();
        ledger.rename(1, 1000, today(), "Hydrate!").await.unwrap();

        let outcome = ledger.remove(1, &habit).await.unwrap();
        assert_eq!(outcome, Removal::RevertToPredefined);

        // The predefined habit itself survives under its original name.
        let habit = catalog.find_habit(1000).await.unwrap().unwrap();
        assert_eq!(habit.habit_name, "Drink 8 Glasses of Water");
        assert!(ledger.entry(1, 1000).await.unwrap().is_none());
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/catalog.sql"))]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_remove_plain_predefined_unselects(pool: PgPool) {
        let catalog = CatalogRepository::new(pool.clone());
        let ledger = SelectionRepository::new(pool.clone());

        let habit = catalog.find_habit(1000).await.unwrap().unwrap();
        ledger.adopt(1, 1000, today()).await.unwrap();

        let outcome = ledger.remove(1, &habit).await.unwrap();
        assert_eq!(outcome, Removal::Unselect);
        assert!(catalog.find_habit(1000).await.unwrap().is_some());
    }
}
