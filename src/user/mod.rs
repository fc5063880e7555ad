mod builder;
mod repository;
mod service;

pub use builder::*;
pub use repository::*;
pub use service::*;

use serde::{Deserialize, Serialize};

/// User as saved on database.
#[derive(
    Clone, Debug, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow,
)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub dob: Option<chrono::NaiveDate>,
    pub gender: Option<String>,
    pub mobile: Option<String>,
    #[serde(skip)]
    pub email: String,
    #[serde(skip)]
    pub password: String,
    /// Email or username used to look the user up; never persisted.
    #[sqlx(skip)]
    #[serde(skip)]
    pub login: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
