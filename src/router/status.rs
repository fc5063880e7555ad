//! Public configuration page for front-end identification and customization.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;

/// Structured configuration.
#[derive(Serialize)]
pub struct Status {
    version: String,
    name: String,
    url: String,
}

/// Public server status (configuration).
pub async fn status(State(state): State<AppState>) -> Json<Status> {
    Json(Status {
        version: env!("CARGO_PKG_VERSION").into(),
        name: if state.config.name.is_empty() {
            env!("CARGO_CRATE_NAME").into()
        } else {
            state.config.name.clone()
        },
        url: state.config.url.clone(),
    })
}
