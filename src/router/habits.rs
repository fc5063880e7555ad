//! Adopted habits and their daily statuses.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::catalog::CatalogRepository;
use crate::error::{Result, ServerError};
use crate::ledger::SelectionRepository;
use crate::router::Valid;
use crate::router::categories::Outcome;
use crate::tracker::{BoardEntry, StatusRepository, TaskStatus};
use crate::user::User;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        // `GET|POST /my_habits` goes to `my_habits`/`adopt`.
        .route("/my_habits", get(my_habits).post(adopt))
        // `POST /update_habit_status` goes to `update_status`.
        .route("/update_habit_status", post(update_status))
        // `POST /remove_habit/:CATEGORY/:ID` goes to `remove`.
        .route("/remove_habit/{category_id}/{habit_id}", post(remove))
        .route_layer(middleware::from_fn_with_state(state, super::auth))
}

fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}

#[derive(Debug, Serialize)]
pub struct Board {
    pub date: chrono::NaiveDate,
    pub habits: Vec<BoardEntry>,
}

/// Today's board for the caller.
///
/// Reconciles missing status rows for the day before answering, so every
/// adopted habit shows up at least as Pending.
async fn my_habits(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<Board>> {
    let tracker = StatusRepository::new(state.db.postgres.clone());
    let date = today();

    let created = tracker.ensure_today(user.user_id, date).await?;
    if created > 0 {
        tracing::debug!(
            user_id = user.user_id,
            created,
            "daily statuses reconciled"
        );
    }

    let habits = tracker.board(user.user_id, date).await?;
    Ok(Json(Board { date, habits }))
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct AdoptBody {
    pub habit_id: i64,
    /// Optional display override; also adopts when not yet adopted.
    #[validate(length(min = 1, max = 255))]
    pub custom_name: Option<String>,
}

/// Adopt a habit, optionally under a custom display name.
async fn adopt(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Valid(body): Valid<AdoptBody>,
) -> Result<Json<Outcome>> {
    let catalog = CatalogRepository::new(state.db.postgres.clone());
    let ledger = SelectionRepository::new(state.db.postgres.clone());

    let habit = catalog
        .find_habit(body.habit_id)
        .await?
        .filter(|h| h.visible_to(user.user_id))
        .ok_or(ServerError::NotFound { resource: "habit" })?;

    let message = match body.custom_name {
        Some(custom_name) => {
            ledger
                .rename(user.user_id, habit.habit_id, today(), &custom_name)
                .await?;
            "Habit adopted under a custom name."
        },
        None => {
            if ledger.adopt(user.user_id, habit.habit_id, today()).await? {
                "Habit added to my habits."
            } else {
                "Habit is already in my habits."
            }
        },
    };

    Ok(Json(Outcome {
        success: true,
        message: message.to_owned(),
    }))
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct StatusBody {
    pub habit_id: i64,
    pub status: TaskStatus,
}

/// Set today's status for a habit.
///
/// Answers `success: false` when no status row exists for today, which
/// happens when the board was never requested today.
async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Valid(body): Valid<StatusBody>,
) -> Result<Json<Outcome>> {
    let tracker = StatusRepository::new(state.db.postgres.clone());

    let affected = tracker
        .mark(user.user_id, body.habit_id, today(), body.status)
        .await?;

    if affected == 0 {
        return Ok(Json(Outcome {
            success: false,
            message: "No status to update for today.".to_owned(),
        }));
    }

    Ok(Json(Outcome {
        success: true,
        message: format!("Habit marked as {}.", body.status),
    }))
}

/// Remove a habit from the caller's selection.
///
/// The answer's message tells which branch fired: custom habits vanish for
/// good, renamed predefined ones revert, plain ones are just un-adopted.
async fn remove(
    State(state): State<AppState>,
    Path((category_id, habit_id)): Path<(i64, i64)>,
    Extension(user): Extension<User>,
) -> Result<Json<Outcome>> {
    let catalog = CatalogRepository::new(state.db.postgres.clone());
    let ledger = SelectionRepository::new(state.db.postgres.clone());

    let habit = catalog
        .find_habit(habit_id)
        .await?
        .filter(|h| h.category_id == category_id)
        .filter(|h| h.visible_to(user.user_id))
        .ok_or(ServerError::NotFound { resource: "habit" })?;

    let outcome = ledger.remove(user.user_id, &habit).await?;

    Ok(Json(Outcome {
        success: true,
        message: outcome.message().to_owned(),
    }))
}
