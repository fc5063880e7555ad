use std::sync::Arc;

use sqlx::{Pool, Postgres};
use validator::ValidationErrors;

use crate::crypto::PasswordManager;
use crate::error::Result;
use crate::user::{User, UserRepository};

/// User manager.
#[derive(Clone)]
pub struct UserService {
    pub repo: UserRepository,
    pub crypto: Arc<PasswordManager>,
    pub data: User,
}

impl UserService {
    /// Create a new [`UserService`].
    pub fn new(
        user: User,
        pool: Pool<Postgres>,
        crypto: Arc<PasswordManager>,
    ) -> Self {
        Self {
            data: user,
            repo: UserRepository::new(pool),
            crypto,
        }
    }

    /// Create builded user.
    ///
    /// Hash password before insertion.
    pub async fn create_user(mut self) -> Result<Self> {
        self.data.password = self.crypto.hash_password(&self.data.password)?;
        self.data.user_id = self.repo.insert(&self.data).await?;
        Ok(self)
    }

    /// Find current user using `user_id` field.
    pub async fn find_by_id(mut self) -> Result<Self> {
        self.data = self.repo.find_by_id(self.data.user_id).await?;
        Ok(self)
    }

    /// Find current user using the `login` identifier.
    pub async fn find_by_login(mut self) -> Result<Self> {
        let login = self.data.login.clone().unwrap_or_default();
        self.data = self.repo.find_by_login(&login).await?;
        Ok(self)
    }

    /// Check a password against the stored credential.
    pub fn verify_password(
        &self,
        password: &str,
    ) -> std::result::Result<(), ValidationErrors> {
        self.crypto.verify_password(password, &self.data.password)
    }
}
