//! Typed builder for User.

use std::sync::Arc;

use sqlx::{Pool, Postgres};

use crate::crypto::PasswordManager;
use crate::user::{User, UserService};

/// [`User`] builder.
#[derive(Debug, Clone)]
pub struct UserBuilder<Id, Login> {
    id: Id,
    login: Login,
    username: String,
    email: String,
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
    dob: Option<chrono::NaiveDate>,
    gender: Option<String>,
    mobile: Option<String>,
}

/// Value is missing on [`UserBuilder`].
#[derive(Debug, Clone)]
pub struct Missing;

/// Value is present on [`UserBuilder`].
#[derive(Debug, Clone)]
pub struct Present<T>(pub T);

impl UserBuilder<Missing, Missing> {
    /// Create a new [`UserBuilder`].
    pub fn new() -> Self {
        Self {
            id: Missing,
            login: Missing,
            username: String::default(),
            email: String::default(),
            password: String::default(),
            first_name: None,
            last_name: None,
            dob: None,
            gender: None,
            mobile: None,
        }
    }
}

impl<Login> UserBuilder<Missing, Login> {
    /// Update `id` field on [`UserBuilder`].
    pub fn id(self, id: i64) -> UserBuilder<Present<i64>, Login> {
        UserBuilder {
            id: Present(id),
            login: self.login,
            username: self.username,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            dob: self.dob,
            gender: self.gender,
            mobile: self.mobile,
        }
    }
}

impl<Id> UserBuilder<Id, Missing> {
    /// Update `login` field on [`UserBuilder`].
    /// The login identifier matches either the email or the username.
    pub fn login(
        self,
        login: impl Into<String>,
    ) -> UserBuilder<Id, Present<String>> {
        UserBuilder {
            id: self.id,
            login: Present(login.into()),
            username: self.username,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            dob: self.dob,
            gender: self.gender,
            mobile: self.mobile,
        }
    }
}

impl<Id, Login> UserBuilder<Id, Login> {
    /// Update `username` field on [`UserBuilder`].
    pub fn username(mut self, username: impl ToString) -> Self {
        self.username = username.to_string();
        self
    }

    /// Update `email` field on [`UserBuilder`].
    pub fn email(mut self, email: impl ToString) -> Self {
        self.email = email.to_string();
        self
    }

    /// Update `password` field on [`UserBuilder`].
    pub fn password(mut self, password: impl ToString) -> Self {
        self.password = password.to_string();
        self
    }

    /// Update `first_name` field on [`UserBuilder`].
    pub fn first_name(mut self, first_name: Option<String>) -> Self {
        self.first_name = first_name;
        self
    }

    /// Update `last_name` field on [`UserBuilder`].
    pub fn last_name(mut self, last_name: Option<String>) -> Self {
        self.last_name = last_name;
        self
    }

    /// Update `dob` field on [`UserBuilder`].
    pub fn dob(mut self, dob: Option<chrono::NaiveDate>) -> Self {
        self.dob = dob;
        self
    }

    /// Update `gender` field on [`UserBuilder`].
    pub fn gender(mut self, gender: Option<String>) -> Self {
        self.gender = gender;
        self
    }

    /// Update `mobile` field on [`UserBuilder`].
    pub fn mobile(mut self, mobile: Option<String>) -> Self {
        self.mobile = mobile;
        self
    }

}

impl UserBuilder<Missing, Missing> {
    /// Build a fresh [`User`] record, ready to be created.
    pub fn build(
        self,
        pool: Pool<Postgres>,
        crypto: Arc<PasswordManager>,
    ) -> UserService {
        let user = User {
            username: self.username,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            dob: self.dob,
            gender: self.gender,
            mobile: self.mobile,
            ..Default::default()
        };

        UserService::new(user, pool, crypto)
    }
}

impl UserBuilder<Present<i64>, Missing> {
    /// Build a [`User`] with `id`.
    pub fn build(
        self,
        pool: Pool<Postgres>,
        crypto: Arc<PasswordManager>,
    ) -> UserService {
        let user = User {
            user_id: self.id.0,
            username: self.username,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            dob: self.dob,
            gender: self.gender,
            mobile: self.mobile,
            ..Default::default()
        };

        UserService::new(user, pool, crypto)
    }
}

impl UserBuilder<Missing, Present<String>> {
    /// Build a [`User`] with `login`.
    pub fn build(
        self,
        pool: Pool<Postgres>,
        crypto: Arc<PasswordManager>,
    ) -> UserService {
        let user = User {
            login: Some(self.login.0),
            username: self.username,
            email: self.email,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            dob: self.dob,
            gender: self.gender,
            mobile: self.mobile,
            ..Default::default()
        };

        UserService::new(user, pool, crypto)
    }
}
