use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::router::Valid;
use crate::user::UserBuilder;

pub const TOKEN_TYPE: &str = "Bearer";

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(
        length(min = 2, max = 30),
        custom(
            function = "crate::router::validate_username",
            message = "Username must be alphanumeric."
        )
    )]
    pub username: String,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(length(
        min = 8,
        max = 255,
        message = "Password must contain at least 8 characters."
    ))]
    pub password: String,
    #[validate(length(max = 255))]
    pub first_name: Option<String>,
    #[validate(length(max = 255))]
    pub last_name: Option<String>,
    pub dob: Option<chrono::NaiveDate>,
    #[validate(length(max = 20))]
    pub gender: Option<String>,
    #[validate(length(max = 50))]
    pub mobile: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub token_type: String,
    pub token: String,
    pub expires_in: u64,
}

/// Handler to create user.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Result<(StatusCode, Json<Response>)> {
    let user = UserBuilder::new()
        .username(body.username.to_lowercase())
        .email(&body.email)
        .password(&body.password)
        .first_name(body.first_name)
        .last_name(body.last_name)
        .dob(body.dob)
        .gender(body.gender)
        .mobile(body.mobile)
        .build(state.db.postgres.clone(), Arc::clone(&state.crypto))
        .create_user()
        .await?;

    let token = state.token.create(user.data.user_id)?;

    Ok((
        StatusCode::CREATED,
        Json(Response {
            token_type: TOKEN_TYPE.to_owned(),
            token,
            expires_in: crate::token::EXPIRATION_TIME,
        }),
    ))
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;
    use crate::*;
    use axum::http::Method;
    use http_body_util::BodyExt;
    use serde_json::json;
    use sqlx::{Pool, Postgres};
    use std::time::{SystemTime, UNIX_EPOCH};

    #[sqlx::test]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_create_handler(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());

        let req_body = router::create::Body {
            username: "alice".into(),
            email: "alice@example.com".into(),
            password: "P$soW%920$n&".into(),
            first_name: Some("Alice".into()),
            last_name: None,
            dob: None,
            gender: None,
            mobile: None,
        };
        let response = make_request(
            None,
            app,
            Method::POST,
            "/create",
            json!(req_body).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body: Response = serde_json::from_slice(&body).unwrap();
        assert_eq!(body.token_type, TOKEN_TYPE);
        assert_eq!(body.expires_in, crate::token::EXPIRATION_TIME);
        assert!(body.token.is_ascii());

        let claims = state.token.decode(&body.token).unwrap();
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs();
        assert!(claims.exp > time);
    }

    #[sqlx::test]
    #[ignore = "needs a running PostgreSQL instance"]
    async fn test_create_with_short_password(pool: Pool<Postgres>) {
        let state = router::state(pool);
        let app = app(state.clone());

        let req_body = router::create::Body {
            username: "bob".into(),
            email: "bob@example.com".into(),
            password: "short".into(),
            first_name: None,
            last_name: None,
            dob: None,
            gender: None,
            mobile: None,
        };
        let response = make_request(
            None,
            app,
            Method::POST,
            "/create",
            json!(req_body).to_string(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
