//! Handle database requests.

use sqlx::{Pool, Postgres};

use crate::error::Result;
use crate::user::User;

#[derive(Clone)]
pub struct UserRepository {
    pool: Pool<Postgres>,
}

impl UserRepository {
    /// Create a new [`UserRepository`].
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert [`User`] into database, returning the generated id.
    pub async fn insert(&self, user: &User) -> Result<i64> {
        let (user_id,): (i64,) = sqlx::query_as(
            r#"INSERT INTO users (first_name, last_name, username, dob, gender, mobile, email, password)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING user_id"#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.username)
        .bind(user.dob)
        .bind(&user.gender)
        .bind(&user.mobile)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await?;

        Ok(user_id)
    }

    /// Find current user using `user_id` field.
    pub async fn find_by_id(&self, user_id: i64) -> Result<User> {
        let query = get_by_field_query(Field::Id);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }

    /// Find current user using a login identifier, matching either the
    /// email or the username.
    pub async fn find_by_login(&self, login: &str) -> Result<User> {
        let query = get_by_field_query(Field::Login);

        let user = sqlx::query_as::<_, User>(&query)
            .bind(login)
            .fetch_one(&self.pool)
            .await?;

        Ok(user)
    }
}

#[derive(Debug, Clone)]
enum Field {
    Id,
    Login,
}

fn get_by_field_query(field: Field) -> String {
    let filter = match field {
        Field::Id => "u.user_id = $1",
        Field::Login => "u.email = $1 OR u.username = $1",
    };

    format!(
        r#"SELECT
                u.user_id,
                u.username,
                u.first_name,
                u.last_name,
                u.dob,
                u.gender,
                u.mobile,
                u.email,
                u.password,
                u.created_at
            FROM users u
            WHERE {filter}"#
    )
}
