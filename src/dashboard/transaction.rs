//! Database queries for retrieving dashboard transaction data.
//!
//! This module provides a simplified transaction view for dashboard
//! aggregations, containing only the fields needed for totals and charts.

use rusqlite::Connection;

use crate::{Amount, Error, Timestamp, TransactionType, dashboard::period::DateWindow};

/// A simplified transaction view for dashboard aggregations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardTransaction {
    pub amount: Amount,
    pub kind: TransactionType,
    pub date: Timestamp,
}

/// Get the transactions dated within `window`, both ends included.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub(super) fn get_transactions_in_window(
    window: &DateWindow,
    connection: &Connection,
) -> Result<Vec<DashboardTransaction>, Error> {
    connection
        .prepare(
            "SELECT amount, type, date FROM \"transaction\"
             WHERE date BETWEEN ?1 AND ?2",
        )?
        .query_map((window.start, window.end), |row| {
            Ok(DashboardTransaction {
                amount: row.get(0)?,
                kind: row.get(1)?,
                date: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, rusqlite::Error>>()
        .map_err(|error| error.into())
}
