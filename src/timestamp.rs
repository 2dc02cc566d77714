//! Local wall-clock timestamps for transactions and date windows.

use std::fmt::Display;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Serialize, Serializer};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description, macros::time,
};
use time_tz::Tz;

use crate::{Error, timezone::to_local_time};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const MINUTES_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]");
const SECONDS_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const SUBSECONDS_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");
const DISPLAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]");
// A fixed width keeps text ordering in SQLite identical to chronological ordering.
const DB_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");

/// The last representable millisecond of a day.
const END_OF_DAY: Time = time!(23:59:59.999);

/// A date and time of day in the server's local timezone, with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(PrimitiveDateTime);

impl Timestamp {
    /// Create a timestamp, dropping any precision finer than a millisecond.
    pub fn new(date_time: PrimitiveDateTime) -> Self {
        let time = date_time.time();
        let millisecond_nanos = u32::from(time.millisecond()) * 1_000_000;

        match time.replace_nanosecond(millisecond_nanos) {
            Ok(time) => Self(date_time.replace_time(time)),
            Err(_) => Self(date_time),
        }
    }

    /// The first millisecond of `date`.
    pub fn start_of_day(date: Date) -> Self {
        Self(date.midnight())
    }

    /// The last millisecond of `date`.
    pub fn end_of_day(date: Date) -> Self {
        Self(PrimitiveDateTime::new(date, END_OF_DAY))
    }

    /// The current time in `timezone`.
    pub fn now(timezone: &Tz) -> Self {
        Self::new(to_local_time(OffsetDateTime::now_utc(), timezone))
    }

    /// Parse a timestamp supplied by a client.
    ///
    /// Accepts a plain date (`2024-03-05`, read as midnight), a local date
    /// and time (`2024-03-05T14:30`, `2024-03-05T14:30:00` or
    /// `2024-03-05T14:30:00.250`), or an RFC 3339 timestamp with an offset,
    /// which is converted to local time in `timezone`.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidDate] if `input` is in none of these forms.
    pub fn parse(input: &str, timezone: &Tz) -> Result<Self, Error> {
        let input = input.trim();

        if let Ok(date) = Date::parse(input, DATE_FORMAT) {
            return Ok(Self::start_of_day(date));
        }

        Self::parse_date_time(input, timezone)
    }

    /// Like [Timestamp::parse], but a plain date is read as the end of that
    /// day so that it can be used as the inclusive end of a range.
    pub fn parse_inclusive_end(input: &str, timezone: &Tz) -> Result<Self, Error> {
        let input = input.trim();

        if let Ok(date) = Date::parse(input, DATE_FORMAT) {
            return Ok(Self::end_of_day(date));
        }

        Self::parse_date_time(input, timezone)
    }

    fn parse_date_time(input: &str, timezone: &Tz) -> Result<Self, Error> {
        for format in [SUBSECONDS_FORMAT, SECONDS_FORMAT, MINUTES_FORMAT] {
            if let Ok(date_time) = PrimitiveDateTime::parse(input, format) {
                return Ok(Self::new(date_time));
            }
        }

        OffsetDateTime::parse(input, &Rfc3339)
            .map(|date_time| Self::new(to_local_time(date_time, timezone)))
            .map_err(|_| Error::InvalidDate(input.to_owned()))
    }

    /// The calendar date of the timestamp.
    pub fn date(&self) -> Date {
        self.0.date()
    }

    /// The hour of the day, from 0 to 23.
    pub fn hour(&self) -> u8 {
        self.0.hour()
    }

    fn format_with(&self, format: &[BorrowedFormatItem<'_>]) -> String {
        // The format descriptions above only use components every
        // `PrimitiveDateTime` has, so formatting cannot fail.
        self.0.format(format).unwrap_or_else(|_| self.0.to_string())
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format_with(DISPLAY_FORMAT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.format_with(DB_FORMAT)))
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        PrimitiveDateTime::parse(value.as_str()?, DB_FORMAT)
            .map(Self)
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}
