//! Handle database requests for the habit catalog.

use sqlx::{Pool, Postgres};

use crate::catalog::{Category, Habit};
use crate::error::Result;

const HABIT_COLUMNS: &str = "habit_id, category_id, user_id, habit_name, is_custom, is_active, created_at";

#[derive(Clone)]
pub struct CatalogRepository {
    pool: Pool<Postgres>,
}

impl CatalogRepository {
    /// Create a new [`CatalogRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// All predefined categories, shared by every user.
    pub async fn predefined_categories(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"SELECT category_id, category_name, is_custom, user_id
                FROM categories WHERE NOT is_custom
                ORDER BY category_id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Custom categories owned by a user.
    pub async fn custom_categories(
        &self,
        user_id: i64,
    ) -> Result<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"SELECT category_id, category_name, is_custom, user_id
                FROM categories WHERE is_custom AND user_id = $1
                ORDER BY category_id"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Find a category by id.
    pub async fn find_category(
        &self,
        category_id: i64,
    ) -> Result<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"SELECT category_id, category_name, is_custom, user_id
                FROM categories WHERE category_id = $1"#,
        )
        .bind(category_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Habits under a category visible to a user: every predefined habit
    /// plus the user's own custom ones.
    pub async fn habits_in_category(
        &self,
        category_id: i64,
        user_id: i64,
    ) -> Result<Vec<Habit>> {
        let query = format!(
            r#"SELECT {HABIT_COLUMNS} FROM habits
                WHERE category_id = $1 AND (NOT is_custom OR user_id = $2)
                ORDER BY habit_id"#
        );

        let habits = sqlx::query_as::<_, Habit>(&query)
            .bind(category_id)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(habits)
    }

    /// Find a habit by id.
    pub async fn find_habit(&self, habit_id: i64) -> Result<Option<Habit>> {
        let query =
            format!("SELECT {HABIT_COLUMNS} FROM habits WHERE habit_id = $1");

        let habit = sqlx::query_as::<_, Habit>(&query)
            .bind(habit_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(habit)
    }

    /// Create a custom category owned by a user.
    pub async fn create_category(
        &self,
        user_id: i64,
        category_name: &str,
    ) -> Result<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"INSERT INTO categories (category_name, is_custom, user_id)
                VALUES ($1, TRUE, $2)
                RETURNING category_id, category_name, is_custom, user_id"#,
        )
        .bind(category_name)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Delete a custom category owned by a user.
    /// Predefined categories are never deleted through here.
    pub async fn delete_category(
        &self,
        user_id: i64,
        category_id: i64,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"DELETE FROM categories
                WHERE category_id = $1 AND is_custom AND user_id = $2"#,
        )
        .bind(category_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Create a custom habit owned by a user under a category.
    pub async fn create_habit(
        &self,
        user_id: i64,
        category_id: i64,
        habit_name: &str,
    ) -> Result<Habit> {
        let query = format!(
            r#"INSERT INTO habits (category_id, user_id, habit_name, is_custom)
                VALUES ($1, $2, $3, TRUE)
                RETURNING {HABIT_COLUMNS}"#
        );

        let habit = sqlx::query_as::<_, Habit>(&query)
            .bind(category_id)
            .bind(user_id)
            .bind(habit_name)
            .fetch_one(&self.pool)
            .await?;

        Ok(habit)
    }

    /// Rename a custom habit owned by a user.
    pub async fn rename_habit(
        &self,
        user_id: i64,
        habit_id: i64,
        habit_name: &str,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"UPDATE habits SET habit_name = $1
                WHERE habit_id = $2 AND is_custom AND user_id = $3"#,
        )
        .bind(habit_name)
        .bind(habit_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
