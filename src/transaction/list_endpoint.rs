//! Transaction listing endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    timezone::resolve_local_timezone,
    transaction::{TransactionQuery, query_transactions},
};

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Respond with the transactions matching the query string, newest first.
pub async fn get_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Response, Error> {
    let timezone = resolve_local_timezone(&state.local_timezone)?;
    let filter = query.into_filter(timezone)?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transactions = query_transactions(&filter, &connection)?;

    Ok(Json(transactions).into_response())
}
