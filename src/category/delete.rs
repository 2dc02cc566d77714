//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde_json::json;

use crate::{AppState, CategoryId, Error, category::delete_category};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Delete a category that no transaction refers to.
pub async fn delete_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<DeleteCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    delete_category(category_id, &connection)?;

    Ok(Json(json!({ "message": "Category deleted successfully" })).into_response())
}

#[cfg(test)]
mod delete_category_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use time::macros::datetime;

    use crate::{
        TransactionType,
        category::get_category,
        test_utils::{
            assert_json_error, get_test_connection, insert_category, insert_transaction,
            parse_json_body,
        },
    };

    use super::{DeleteCategoryState, delete_category_endpoint};

    #[tokio::test]
    async fn deletes_unused_category() {
        let connection = get_test_connection();
        let category = insert_category("Limpeza", TransactionType::Expense, &connection);
        let state = DeleteCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_category_endpoint(Path(category.id), State(state.clone()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            parse_json_body(response).await["message"],
            "Category deleted successfully"
        );
        let connection = state.db_connection.lock().unwrap();
        assert!(get_category(category.id, &connection).is_err());
    }

    #[tokio::test]
    async fn missing_category_is_not_found() {
        let state = DeleteCategoryState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = delete_category_endpoint(Path(7), State(state))
            .await
            .into_response();

        assert_json_error(
            response,
            StatusCode::NOT_FOUND,
            "tried to delete a category that is not in the database",
        )
        .await;
    }

    #[tokio::test]
    async fn category_in_use_is_a_conflict() {
        let connection = get_test_connection();
        let category = insert_category("Transporte", TransactionType::Expense, &connection);
        insert_transaction(
            "Ônibus",
            450,
            TransactionType::Expense,
            datetime!(2024-03-05 08:15),
            &category,
            &connection,
        );
        let state = DeleteCategoryState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_category_endpoint(Path(category.id), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
