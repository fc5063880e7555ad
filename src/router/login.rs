use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::AppState;
use crate::error::{Result, ServerError};
use crate::router::Valid;
use crate::router::create::{Response, TOKEN_TYPE};
use crate::user::UserBuilder;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    /// Email or username.
    #[validate(length(min = 2, max = 255))]
    pub login: String,
    #[validate(length(min = 8, max = 255))]
    pub password: String,
}

/// Handler to log a user in.
///
/// Unknown identifier and wrong password answer the same way.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<Json<Response>> {
    let user = match UserBuilder::new()
        .login(&body.login)
        .build(state.db.postgres.clone(), Arc::clone(&state.crypto))
        .find_by_login()
        .await
    {
        Ok(user) => user,
        Err(ServerError::Sql(sqlx::Error::RowNotFound)) => {
            return Err(ServerError::InvalidCredentials);
        },
        Err(err) => return Err(err),
    };

    if user.verify_password(&body.password).is_err() {
        return Err(ServerError::InvalidCredentials);
    }

    let token = state.token.create(user.data.user_id)?;

    Ok(Json(Response {
        token_type: TOKEN_TYPE.to_owned(),
        token,
        expires_in: crate::token::EXPIRATION_TIME,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::*;
    use axum::http::{Method, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::json;
    use sqlx::{Pool, Postgres};

    #[sqlx::test]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_login_after_create(pool: Pool<Postgres>) {
        let state = router::state(pool);

        let create_body = router::create::Body {
            username: "carol".into(),
            email: "carol@example.com".into(),
            password: "P$soW%920$n&".into(),
            first_name: None,
            last_name: None,
            dob: None,
            gender: None,
            mobile: None,
        };
        let response = make_request(
            None,
            app(state.clone()),
            Method::POST,
            "/create",
            json!(create_body).to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);

        // By username.
        let response = make_request(
            None,
            app(state.clone()),
            Method::POST,
            "/login",
            json!({ "login": "carol", "password": "P$soW%920$n&" })
                .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.token_type, TOKEN_TYPE);

        // By email too.
        let response = make_request(
            None,
            app(state.clone()),
            Method::POST,
            "/login",
            json!({ "login": "carol@example.com", "password": "P$soW%920$n&" })
                .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        // Wrong password is unauthorized, not a validation error.
        let response = make_request(
            None,
            app(state.clone()),
            Method::POST,
            "/login",
            json!({ "login": "carol", "password": "wrong password" })
                .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_login_unknown_user(pool: Pool<Postgres>) {
        let state = router::state(pool);

        let response = make_request(
            None,
            app(state),
            Method::POST,
            "/login",
            json!({ "login": "nobody", "password": "P$soW%920$n&" })
                .to_string(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
