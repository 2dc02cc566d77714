#![allow(missing_docs)]

pub(crate) mod db;
pub(crate) mod http;

pub(crate) use db::{get_test_connection, insert_category, insert_transaction};
pub(crate) use http::{assert_json_error, get_header, parse_json_body};

#[track_caller]
pub(crate) fn get_timezone(canonical_timezone: &str) -> &'static time_tz::Tz {
    crate::timezone::get_local_timezone(canonical_timezone).expect("Unknown test timezone")
}
