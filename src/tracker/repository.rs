//! Handle database requests for daily statuses.

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};

use crate::error::Result;
use crate::tracker::{BoardEntry, DailyStatus, TaskStatus};

#[derive(Clone)]
pub struct StatusRepository {
    pool: Pool<Postgres>,
}

impl StatusRepository {
    /// Create a new [`StatusRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Reconcile the day's rows for a user: every ledger entry lacking a
    /// status row for `today` gets a Pending one.
    ///
    /// Runs on every board request; the unique (user, habit, date)
    /// constraint makes repeated and racing calls harmless. Returns the
    /// number of rows created.
    pub async fn ensure_today(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"INSERT INTO daily_task_status (user_id, habit_id, task_date)
                SELECT user_id, habit_id, $2
                FROM user_selected_habits
                WHERE user_id = $1
                ON CONFLICT (user_id, habit_id, task_date) DO NOTHING"#,
        )
        .bind(user_id)
        .bind(today)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Set the status of a habit for `today`, stamping the time.
    ///
    /// Affects zero rows when no status row exists yet, which callers
    /// treat as a silent failure rather than an error.
    pub async fn mark(
        &self,
        user_id: i64,
        habit_id: i64,
        today: NaiveDate,
        status: TaskStatus,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"UPDATE daily_task_status
                SET status = $4, marked_at = NOW()
                WHERE user_id = $1 AND habit_id = $2 AND task_date = $3"#,
        )
        .bind(user_id)
        .bind(habit_id)
        .bind(today)
        .bind(status)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// The day's board for a user: adopted habits with their display name,
    /// category and current status.
    pub async fn board(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<Vec<BoardEntry>> {
        let entries = sqlx::query_as::<_, BoardEntry>(
            r#"SELECT
                    h.habit_id,
                    COALESCE(NULLIF(ush.custom_name, ''), h.habit_name) AS name,
                    c.category_name,
                    dts.status,
                    dts.marked_at
                FROM user_selected_habits ush
                JOIN habits h ON h.habit_id = ush.habit_id
                JOIN categories c ON c.category_id = h.category_id
                JOIN daily_task_status dts
                    ON dts.user_id = ush.user_id
                    AND dts.habit_id = ush.habit_id
                    AND dts.task_date = $2
                WHERE ush.user_id = $1
                ORDER BY ush.order_position NULLS LAST, ush.entry_id"#,
        )
        .bind(user_id)
        .bind(today)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// The raw status row for a (user, habit, date) triple.
    pub async fn find(
        &self,
        user_id: i64,
        habit_id: i64,
        date: NaiveDate,
    ) -> Result<Option<DailyStatus>> {
        let status = sqlx::query_as::<_, DailyStatus>(
            r#"SELECT status_id, user_id, habit_id, task_date, status, marked_at
                FROM daily_task_status
                WHERE user_id = $1 AND habit_id = $2 AND task_date = $3"#,
        )
        .bind(user_id)
        .bind(habit_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::SelectionRepository;
    use sqlx::PgPool;

    fn today() -> NaiveDate {
        chrono::Utc::now().date_naive()
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/catalog.sql"))]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_ensure_today_creates_pending_rows(pool: PgPool) {
        let ledger = SelectionRepository::new(pool.clone());
        let tracker = StatusRepository::new(pool.clone());

        ledger.adopt(1, 1000, today()).await.unwrap();
        ledger.adopt(1, 1001, today()).await.unwrap();

        assert_eq!(tracker.ensure_today(1, today()).await.unwrap(), 2);

        let row = tracker.find(1, 1000, today()).await.unwrap().unwrap();
        assert_eq!(row.status, TaskStatus::Pending);
        assert!(row.marked_at.is_none());

        // Second run within the same day is a no-op.
        assert_eq!(tracker.ensure_today(1, today()).await.unwrap(), 0);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/catalog.sql"))]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_mark_stamps_time(pool: PgPool) {
        let ledger = SelectionRepository::new(pool.clone());
        let tracker = StatusRepository::new(pool.clone());

        ledger.adopt(1, 1000, today()).await.unwrap();
        tracker.ensure_today(1, today()).await.unwrap();

        let affected = tracker
            .mark(1, 1000, today(), TaskStatus::Completed)
            .await
            .unwrap();
        assert_eq!(affected, 1);

        let row = tracker.find(1, 1000, today()).await.unwrap().unwrap();
        assert_eq!(row.status, TaskStatus::Completed);
        assert!(row.marked_at.is_some());
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/catalog.sql"))]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_mark_without_row_affects_nothing(pool: PgPool) {
        let tracker = StatusRepository::new(pool.clone());

        let affected = tracker
            .mark(1, 1000, today(), TaskStatus::Completed)
            .await
            .unwrap();
        assert_eq!(affected, 0);
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/catalog.sql"))]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_rollover_keeps_history(pool: PgPool) {
        let ledger = SelectionRepository::new(pool.clone());
        let tracker = StatusRepository::new(pool.clone());

        let yesterday = today().pred_opt().unwrap();
        ledger.adopt(1, 1000, yesterday).await.unwrap();

        tracker.ensure_today(1, yesterday).await.unwrap();
        tracker
            .mark(1, 1000, yesterday, TaskStatus::Completed)
            .await
            .unwrap();

        // New day: a fresh Pending row, the old one untouched.
        assert_eq!(tracker.ensure_today(1, today()).await.unwrap(), 1);

        let old = tracker.find(1, 1000, yesterday).await.unwrap().unwrap();
        assert_eq!(old.status, TaskStatus::Completed);
        assert!(old.marked_at.is_some());

        let fresh = tracker.find(1, 1000, today()).await.unwrap().unwrap();
        assert_eq!(fresh.status, TaskStatus::Pending);
        assert!(fresh.marked_at.is_none());
    }

    #[sqlx::test(fixtures("../../fixtures/users.sql", "../../fixtures/catalog.sql"))]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_board_honors_override(pool: PgPool) {
        let ledger = SelectionRepository::new(pool.clone());
        let tracker = StatusRepository::new(pool.clone());

        ledger.rename(1, 1000, today(), "Hydrate!").await.unwrap();
        ledger.adopt(1, 1001, today()).await.unwrap();
        tracker.ensure_today(1, today()).await.unwrap();

        let board = tracker.board(1, today()).await.unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].name, "Hydrate!");
        assert_eq!(board[0].category_name, "Health & Wellness");
        assert_eq!(board[1].name, "Stretch for 5 Minutes");
        assert!(board.iter().all(|e| e.status == TaskStatus::Pending));
    }
}
