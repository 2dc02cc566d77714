//! Resolves the server's configured timezone and converts instants into local time.

use time::{Date, OffsetDateTime, PrimitiveDateTime};
use time_tz::{Offset, TimeZone, Tz};

use crate::Error;

/// Get the timezone for a canonical timezone name, e.g. "America/Sao_Paulo".
///
/// Returns `None` if the name is not a known timezone.
pub fn get_local_timezone(canonical_timezone: &str) -> Option<&'static Tz> {
    time_tz::timezones::get_by_name(canonical_timezone)
}

/// Like [get_local_timezone], but reports an unknown timezone as an [Error].
pub(crate) fn resolve_local_timezone(canonical_timezone: &str) -> Result<&'static Tz, Error> {
    get_local_timezone(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })
}

/// The wall-clock time in `timezone` at `instant`.
///
/// Uses the UTC offset in effect at `instant`, so daylight saving changes
/// between then and now do not shift the result.
pub(crate) fn to_local_time(instant: OffsetDateTime, timezone: &Tz) -> PrimitiveDateTime {
    let offset = timezone.get_offset_utc(&instant).to_utc();
    let local = instant.to_offset(offset);

    PrimitiveDateTime::new(local.date(), local.time())
}

/// Today's date in `timezone`.
pub(crate) fn local_today(timezone: &Tz) -> Date {
    to_local_time(OffsetDateTime::now_utc(), timezone).date()
}
