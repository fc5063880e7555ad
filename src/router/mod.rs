//! HTTP surface of the server.

pub mod categories;
pub mod create;
pub mod habits;
pub mod login;
pub mod status;

use std::sync::Arc;
use std::sync::LazyLock;

use axum::Json;
use axum::extract::{FromRequest, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use regex_lite::Regex;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError};

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::user::{User, UserBuilder};

const BEARER: &str = "Bearer ";

static USERNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9_.-]+$").expect("username regex must parse")
});

/// Extractor running `validator` checks on a JSON body.
pub struct Valid<T>(pub T);

impl<T, S> FromRequest<S> for Valid<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Valid(value))
    }
}

/// Custom middleware for authentification.
///
/// Decodes the bearer token, loads the user behind it and makes it
/// available to handlers as a request extension.
pub(crate) async fn auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let token = match req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
    {
        Some(token) => token.replace(BEARER, ""),
        None => return Err(ServerError::Unauthorized),
    };

    let claims = state
        .token
        .decode(&token)
        .map_err(|_| ServerError::Unauthorized)?;
    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| ServerError::Unauthorized)?;

    let user = UserBuilder::new()
        .id(user_id)
        .build(state.db.postgres.clone(), Arc::clone(&state.crypto))
        .find_by_id()
        .await?;

    req.extensions_mut().insert::<User>(user.data);
    Ok(next.run(req).await)
}

/// Usernames are lowercase letters, digits, dots, dashes and underscores.
pub fn validate_username(
    username: &str,
) -> std::result::Result<(), ValidationError> {
    if USERNAME.is_match(&username.to_lowercase()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_username"))
    }
}

#[cfg(test)]
pub(crate) fn state(pool: sqlx::PgPool) -> AppState {
    use crate::config::Argon2;

    let config = Arc::new(crate::config::Configuration::default());
    let crypto = Arc::new(
        crate::crypto::PasswordManager::new(Some(Argon2 {
            memory_cost: 1024,
            iterations: 1,
            parallelism: 1,
            hash_length: 32,
        }))
        .expect("test argon2 parameters must be accepted"),
    );

    AppState {
        config,
        db: crate::database::Database { postgres: pool },
        crypto,
        token: crate::token::TokenManager::new("https://localhost/", "test"),
    }
}
