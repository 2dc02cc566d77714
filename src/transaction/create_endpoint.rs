//! Transaction creation endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    timezone::resolve_local_timezone,
    transaction::{TransactionPayload, create_transaction, get_transaction_with_category},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// A route handler for creating a new transaction.
///
/// Responds with `201 Created` and the new transaction, including its category.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<TransactionPayload>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(payload) =
        payload.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;
    let timezone = resolve_local_timezone(&state.local_timezone)?;
    let new_transaction = payload.into_new_transaction(timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction = create_transaction(new_transaction, &connection)?;
    let transaction = get_transaction_with_category(transaction.id, &connection)?;

    Ok((StatusCode::CREATED, Json(transaction)).into_response())
}

#[cfg(test)]
mod create_transaction_endpoint_tests {
    use std::sync::{Arc, Mutex};

    use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
    use serde_json::json;

    use crate::{
        Amount, TransactionType,
        test_utils::{assert_json_error, get_test_connection, insert_category, parse_json_body},
        transaction::{TransactionPayload, get_transaction},
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

    fn get_state() -> (CreateTransactionState, i64) {
        let connection = get_test_connection();
        let category = insert_category("Mercado", TransactionType::Expense, &connection);
        let state = CreateTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "America/Sao_Paulo".to_owned(),
        };

        (state, category.id)
    }

    fn payload(body: serde_json::Value) -> TransactionPayload {
        serde_json::from_value(body).expect("Could not deserialize payload")
    }

    #[tokio::test]
    async fn creates_transaction() {
        let (state, category_id) = get_state();
        let body = payload(json!({
            "description": "Macarrão",
            "amount": "14.75",
            "type": "expense",
            "date": "2024-03-05T12:00",
            "categoryId": category_id,
        }));

        let response = create_transaction_endpoint(State(state.clone()), Ok(Json(body)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = parse_json_body(response).await;
        assert_eq!(body["description"], "Macarrão");
        assert_eq!(body["amount"], 14.75);
        assert_eq!(body["type"], "expense");
        assert_eq!(body["date"], "2024-03-05T12:00:00.000");
        assert_eq!(body["category"]["id"], category_id);

        let id = body["id"].as_i64().expect("id should be an integer");
        let connection = state.db_connection.lock().unwrap();
        let stored = get_transaction(id, &connection).unwrap();
        assert_eq!(stored.amount, Amount::from_minor_units(1475));
    }

    #[tokio::test]
    async fn missing_fields_are_bad_request() {
        let (state, _) = get_state();
        let body = payload(json!({ "description": "Macarrão" }));

        let response = create_transaction_endpoint(State(state), Ok(Json(body)))
            .await
            .into_response();

        assert_json_error(response, StatusCode::BAD_REQUEST, "Missing required fields").await;
    }

    #[tokio::test]
    async fn unknown_category_is_bad_request() {
        let (state, category_id) = get_state();
        let body = payload(json!({
            "description": "Macarrão",
            "amount": 14.75,
            "type": "expense",
            "date": "2024-03-05",
            "categoryId": category_id + 1,
        }));

        let response = create_transaction_endpoint(State(state), Ok(Json(body)))
            .await
            .into_response();

        assert_json_error(
            response,
            StatusCode::BAD_REQUEST,
            &format!(
                "the category ID {} does not refer to a valid category",
                category_id + 1
            ),
        )
        .await;
    }
}
