//! Period totals and chart series for the dashboard.
//!
//! [aggregate] is a pure function of its inputs: it never touches the
//! database and can be called concurrently for independent requests.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    Timestamp, TransactionType,
    dashboard::{
        period::{DateWindow, Period, days_in_month},
        transaction::DashboardTransaction,
    },
};

/// Abbreviated month names, January first.
const MONTH_LABELS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

const HOURS_IN_DAY: usize = 24;

/// Income and expense totals over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    pub income: Decimal,
    pub expenses: Decimal,
    /// Always `income - expenses`.
    pub balance: Decimal,
}

/// One point of the chart series: an hour, a day of the month, or a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartBucket {
    pub label: String,
    pub income: Decimal,
    pub expenses: Decimal,
}

impl ChartBucket {
    fn empty(label: String) -> Self {
        Self {
            label,
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
        }
    }
}

/// The totals and chart series for one period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Aggregation {
    pub summary: Summary,
    pub chart_data: Vec<ChartBucket>,
}

/// Sum `transactions` over `window` and split them into chart buckets.
///
/// Transactions outside `window` are ignored, so callers may pass a
/// superset. The chart always has every bucket for the period, even when
/// there are no transactions: 24 hours for a day, one bucket per day of the
/// month, or 12 months for a year.
///
/// `window` should be the result of `resolve_window`
/// for the same `period`.
pub fn aggregate(
    transactions: &[DashboardTransaction],
    period: Period,
    window: &DateWindow,
) -> Aggregation {
    let mut summary = Summary::default();
    let mut chart_data = empty_buckets(period, window);

    for transaction in transactions
        .iter()
        .filter(|transaction| window.contains(transaction.date))
    {
        let amount = transaction.amount.value();
        let bucket = chart_data.get_mut(bucket_index(period, transaction.date));

        match transaction.kind {
            TransactionType::Income => {
                summary.income += amount;
                if let Some(bucket) = bucket {
                    bucket.income += amount;
                }
            }
            TransactionType::Expense => {
                summary.expenses += amount;
                if let Some(bucket) = bucket {
                    bucket.expenses += amount;
                }
            }
        }
    }

    summary.balance = summary.income - summary.expenses;

    Aggregation {
        summary,
        chart_data,
    }
}

fn empty_buckets(period: Period, window: &DateWindow) -> Vec<ChartBucket> {
    let labels: Vec<String> = match period {
        Period::Day => (0..HOURS_IN_DAY).map(|hour| format!("{hour:02}")).collect(),
        Period::Month => {
            let first_day = window.start.date();
            let day_count = days_in_month(first_day.year(), first_day.month());
            (1..=day_count).map(|day| day.to_string()).collect()
        }
        Period::Year => MONTH_LABELS.iter().map(|&label| label.to_owned()).collect(),
    };

    labels.into_iter().map(ChartBucket::empty).collect()
}

/// The bucket for a timestamp already known to be inside the period's window.
fn bucket_index(period: Period, timestamp: Timestamp) -> usize {
    match period {
        Period::Day => usize::from(timestamp.hour()),
        Period::Month => usize::from(timestamp.date().day()) - 1,
        Period::Year => usize::from(u8::from(timestamp.date().month())) - 1,
    }
}
