//! Category editing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, CategoryId, Error,
    category::{CategoryPayload, NewCategory, update_category},
};

/// The state needed for editing a category.
#[derive(Debug, Clone)]
pub struct EditCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Replace a category's name, type and color, responding with the updated category.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryState>,
    payload: Result<Json<CategoryPayload>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(payload) =
        payload.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;
    let new_category = NewCategory::try_from(payload)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = update_category(category_id, new_category, &connection)?;

    Ok(Json(category).into_response())
}
