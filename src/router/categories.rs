//! Category browsing and custom catalog management.

use axum::extract::{Path, State};
use axum::routing::{get, patch, post};
use axum::{Extension, Json, Router, http::StatusCode, middleware};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::catalog::{CatalogRepository, Category, Habit};
use crate::error::{Result, ServerError};
use crate::router::Valid;
use crate::user::User;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        // `GET /dashboard` goes to `dashboard`.
        .route("/dashboard", get(dashboard))
        // `POST /categories` goes to `create_category`.
        .route("/categories", post(create_category))
        // `GET|DELETE /categories/:ID` goes to `category`/`delete_category`.
        .route(
            "/categories/{category_id}",
            get(category).delete(delete_category),
        )
        // `POST /categories/:ID/habits` goes to `create_habit`.
        .route("/categories/{category_id}/habits", post(create_habit))
        // `PATCH /habits/:ID` goes to `rename_habit`.
        .route("/habits/{habit_id}", patch(rename_habit))
        .route_layer(middleware::from_fn_with_state(state, super::auth))
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub predefined: Vec<Category>,
    pub custom: Vec<Category>,
}

/// Predefined categories plus the caller's custom ones.
async fn dashboard(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Dashboard>> {
    let catalog = CatalogRepository::new(state.db.postgres.clone());

    Ok(Json(Dashboard {
        predefined: catalog.predefined_categories().await?,
        custom: catalog.custom_categories(user.user_id).await?,
    }))
}

#[derive(Debug, Serialize)]
pub struct CategoryDetail {
    #[serde(flatten)]
    pub category: Category,
    pub habits: Vec<Habit>,
}

/// A category and the habits the caller may see under it.
async fn category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Extension(user): Extension<User>,
) -> Result<Json<CategoryDetail>> {
    let catalog = CatalogRepository::new(state.db.postgres.clone());

    let category = catalog
        .find_category(category_id)
        .await?
        .filter(|c| !c.is_custom || c.user_id == Some(user.user_id))
        .ok_or(ServerError::NotFound {
            resource: "category",
        })?;
    let habits = catalog
        .habits_in_category(category_id, user.user_id)
        .await?;

    Ok(Json(CategoryDetail { category, habits }))
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CategoryBody {
    #[validate(length(min = 1, max = 255))]
    pub category_name: String,
}

/// Create a custom category owned by the caller.
async fn create_category(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Valid(body): Valid<CategoryBody>,
) -> Result<(StatusCode, Json<Category>)> {
    let catalog = CatalogRepository::new(state.db.postgres.clone());
    let category = catalog
        .create_category(user.user_id, &body.category_name)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    pub message: String,
}

/// Delete one of the caller's custom categories.
async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Extension(user): Extension<User>,
) -> Result<Json<Outcome>> {
    let catalog = CatalogRepository::new(state.db.postgres.clone());

    if catalog.delete_category(user.user_id, category_id).await? == 0 {
        return Err(ServerError::NotFound {
            resource: "category",
        });
    }

    Ok(Json(Outcome {
        success: true,
        message: "Custom category deleted.".to_owned(),
    }))
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct HabitBody {
    #[validate(length(min = 1, max = 255))]
    pub habit_name: String,
}

/// Create a custom habit under a category the caller may see.
async fn create_habit(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    Extension(user): Extension<User>,
    Valid(body): Valid<HabitBody>,
) -> Result<(StatusCode, Json<Habit>)> {
    let catalog = CatalogRepository::new(state.db.postgres.clone());

    catalog
        .find_category(category_id)
        .await?
        .filter(|c| !c.is_custom || c.user_id == Some(user.user_id))
        .ok_or(ServerError::NotFound {
            resource: "category",
        })?;

    let habit = catalog
        .create_habit(user.user_id, category_id, &body.habit_name)
        .await?;

    Ok((StatusCode::CREATED, Json(habit)))
}

/// Rename one of the caller's custom habits.
async fn rename_habit(
    State(state): State<AppState>,
    Path(habit_id): Path<i64>,
    Extension(user): Extension<User>,
    Valid(body): Valid<HabitBody>,
) -> Result<Json<Outcome>> {
    let catalog = CatalogRepository::new(state.db.postgres.clone());

    if catalog
        .rename_habit(user.user_id, habit_id, &body.habit_name)
        .await?
        == 0
    {
        return Err(ServerError::NotFound { resource: "habit" });
    }

    Ok(Json(Outcome {
        success: true,
        message: "Habit updated successfully.".to_owned(),
    }))
}
