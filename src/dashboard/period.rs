//! Dashboard periods and the date windows they cover.

use std::{fmt::Display, str::FromStr};

use serde::Serialize;
use time::{Date, Month};

use crate::{Error, Timestamp};

/// The span of time summarised by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// A single day, charted by hour.
    Day,
    /// A calendar month, charted by day.
    #[default]
    Month,
    /// A calendar year, charted by month.
    Year,
}

impl Period {
    fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(Error::InvalidPeriod(other.to_owned())),
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An inclusive range of local timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    /// The first millisecond in the window.
    pub start: Timestamp,
    /// The last millisecond in the window.
    pub end: Timestamp,
}

impl DateWindow {
    /// Whether `timestamp` lies within the window, counting both ends.
    pub fn contains(&self, timestamp: Timestamp) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

/// Get the window covered by `period` around the `anchor` date.
///
/// - `day`: the anchor date from midnight to 23:59:59.999.
/// - `month`: the first to the last day of the anchor's month.
/// - `year`: 1 January to 31 December of the anchor's year.
///
/// # Errors
/// Returns [Error::InvalidDate] if the window would fall outside the range
/// of representable dates.
pub fn resolve_window(period: Period, anchor: Date) -> Result<DateWindow, Error> {
    let (first_day, last_day) = match period {
        Period::Day => (anchor, anchor),
        Period::Month => {
            let last_day = days_in_month(anchor.year(), anchor.month());
            anchor
                .replace_day(1)
                .and_then(|first| anchor.replace_day(last_day).map(|last| (first, last)))
                .map_err(|_| Error::InvalidDate(anchor.to_string()))?
        }
        Period::Year => Date::from_calendar_date(anchor.year(), Month::January, 1)
            .and_then(|first| {
                Date::from_calendar_date(anchor.year(), Month::December, 31)
                    .map(|last| (first, last))
            })
            .map_err(|_| Error::InvalidDate(anchor.to_string()))?,
    };

    Ok(DateWindow {
        start: Timestamp::start_of_day(first_day),
        end: Timestamp::end_of_day(last_day),
    })
}

/// The number of days in `month` of `year`.
pub(crate) fn days_in_month(year: i32, month: Month) -> u8 {
    match month {
        Month::February if is_leap_year(year) => 29,
        Month::February => 28,
        Month::April | Month::June | Month::September | Month::November => 30,
        _ => 31,
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
