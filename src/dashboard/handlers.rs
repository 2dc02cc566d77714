//! Dashboard HTTP handler.
//!
//! This module contains:
//! - The route handler that summarises a period for the dashboard
//! - The query and response types used by the handler

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use time::Date;
use time_tz::Tz;

use crate::{
    AppState, Error, Timestamp,
    dashboard::{
        aggregation::{ChartBucket, Summary, aggregate},
        period::{DateWindow, Period, resolve_window},
        transaction::get_transactions_in_window,
    },
    timezone::{local_today, resolve_local_timezone},
};

/// The state needed for the dashboard.
///
/// Contains the database connection and timezone information required
/// by dashboard handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "America/Sao_Paulo".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string for the dashboard, e.g. `?period=day&date=2024-03-05`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// One of `day`, `month` or `year`. Defaults to `month`.
    pub period: Option<String>,
    /// The anchor date. Defaults to today in the server's timezone.
    pub date: Option<String>,
}

impl DashboardQuery {
    fn period(&self) -> Result<Period, Error> {
        match self.period.as_deref().map(str::trim) {
            None | Some("") => Ok(Period::default()),
            Some(period) => period.parse(),
        }
    }

    fn anchor_date(&self, timezone: &Tz) -> Result<Date, Error> {
        match self.date.as_deref().map(str::trim) {
            None | Some("") => Ok(local_today(timezone)),
            Some(date) => Timestamp::parse(date, timezone).map(|timestamp| timestamp.date()),
        }
    }
}

/// The dashboard summary of one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub summary: Summary,
    pub chart_data: Vec<ChartBucket>,
    pub period: Period,
    pub date_range: DateWindow,
}

/// Summarise the transactions in the requested period.
///
/// Responds with `400 Bad Request` if the period or date cannot be parsed.
pub async fn get_dashboard(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let timezone = resolve_local_timezone(&state.local_timezone)?;
    let period = query.period()?;
    let anchor = query.anchor_date(timezone)?;
    let window = resolve_window(period, anchor)?;

    let transactions = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_transactions_in_window(&window, &connection)
            .inspect_err(|error| tracing::error!("could not get dashboard transactions: {error}"))?
    };

    let aggregation = aggregate(&transactions, period, &window);

    Ok(Json(DashboardResponse {
        summary: aggregation.summary,
        chart_data: aggregation.chart_data,
        period,
        date_range: window,
    })
    .into_response())
}
