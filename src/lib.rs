//! Finance Tracker is a web service for recording income and expenses and
//! viewing summaries of them over a day, month, or year.
//!
//! This library provides a JSON REST API for transactions and categories,
//! plus a dashboard endpoint that aggregates transactions into period totals
//! and chart-ready time series.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use serde_json::json;
use tokio::signal;

mod amount;
mod app_state;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod logging;
mod routing;
mod timestamp;
mod timezone;
mod transaction;
mod transaction_type;

#[cfg(test)]
mod test_utils;

pub use amount::Amount;
pub use app_state::AppState;
pub use category::{CategoryColor, CategoryName, NewCategory, create_category};
pub use database_id::{CategoryId, TransactionId};
pub use db::initialize as initialize_db;
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use timestamp::Timestamp;
pub use timezone::get_local_timezone;
pub use transaction::{NewTransaction, create_transaction};
pub use transaction_type::TransactionType;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The dashboard period was not one of `day`, `month` or `year`.
    #[error("invalid period \"{0}\", expected one of \"day\", \"month\" or \"year\"")]
    InvalidPeriod(String),

    /// A date or timestamp could not be parsed.
    ///
    /// Accepted forms are `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS[.fff]]` and
    /// RFC 3339 timestamps with an offset.
    #[error("invalid date \"{0}\"")]
    InvalidDate(String),

    /// A monetary amount was negative, not a number, or had more than two
    /// decimal places.
    #[error("invalid amount \"{0}\"")]
    InvalidAmount(String),

    /// The transaction type was not `income` or `expense`.
    #[error("invalid type \"{0}\", expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// A category color was not a hex color string such as `#33FF57`.
    #[error("invalid color \"{0}\", expected a hex color such as \"#33FF57\"")]
    InvalidColor(String),

    /// One or more of the fields required to write a record were not given.
    #[error("Missing required fields")]
    MissingFields,

    /// A transaction description was empty or only whitespace.
    #[error("Transaction description cannot be empty")]
    EmptyDescription,

    /// A category name was empty or only whitespace.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A category ID given as text could not be read as an integer.
    #[error("invalid category ID \"{0}\"")]
    InvalidCategoryId(String),

    /// The category ID used to write a transaction did not match a category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// The request body could not be parsed as the expected JSON document.
    #[error("invalid request body: {0}")]
    InvalidRequestBody(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a category that does not exist
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to delete a category that transactions still refer to.
    #[error("the category {0} is used by one or more transactions and cannot be deleted")]
    CategoryInUse(CategoryId),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl Error {
    /// The HTTP status code a client should see for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidPeriod(_)
            | Error::InvalidDate(_)
            | Error::InvalidAmount(_)
            | Error::InvalidTransactionType(_)
            | Error::InvalidColor(_)
            | Error::MissingFields
            | Error::EmptyDescription
            | Error::EmptyCategoryName
            | Error::InvalidCategoryId(_)
            | Error::InvalidCategory(_)
            | Error::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Error::NotFound
            | Error::UpdateMissingTransaction
            | Error::DeleteMissingTransaction
            | Error::UpdateMissingCategory
            | Error::DeleteMissingCategory => StatusCode::NOT_FOUND,
            Error::CategoryInUse(_) => StatusCode::CONFLICT,
            Error::SqlError(_) | Error::DatabaseLockError | Error::InvalidTimezoneError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Server-side failures are not intended to be shown to the client.
        let message = if status.is_server_error() {
            tracing::error!("An unexpected error occurred: {}", self);
            "An unexpected error occurred, check the server logs for more details.".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
