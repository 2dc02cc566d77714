//! Dashboard module
//!
//! Summarises the transactions in a day, month or year into income and
//! expense totals plus a chart series with one bucket per hour, day or month.

mod aggregation;
mod handlers;
mod period;
mod transaction;

pub use aggregation::{Aggregation, ChartBucket, Summary, aggregate};
pub use handlers::{DashboardQuery, DashboardResponse, get_dashboard};
pub use period::{DateWindow, Period, resolve_window};
pub use transaction::DashboardTransaction;
