//! Monetary amounts.
//!
//! Amounts are exact decimals in memory and integer minor units (cents) in
//! the database, so totals never pick up floating-point drift.

use std::{fmt::Display, str::FromStr};

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Serialize, Serializer};

use crate::Error;

/// The number of decimal places kept for an amount.
const MINOR_UNIT_SCALE: u32 = 2;

/// A validated, non-negative amount of money with at most two decimal places.
///
/// The currency is not tracked; whether the money was earned or spent is
/// carried by the [crate::TransactionType] next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount.
    ///
    /// # Errors
    ///
    /// Returns an [Error::InvalidAmount] if `value` is negative, has more
    /// than two decimal places, or does not fit in the database.
    pub fn new(value: Decimal) -> Result<Self, Error> {
        let value = value.normalize();

        if value.is_sign_negative() && !value.is_zero() {
            return Err(Error::InvalidAmount(value.to_string()));
        }

        if value.scale() > MINOR_UNIT_SCALE {
            return Err(Error::InvalidAmount(value.to_string()));
        }

        let amount = Self(value.abs());
        amount
            .to_minor_units()
            .ok_or_else(|| Error::InvalidAmount(value.to_string()))?;

        Ok(amount)
    }

    /// Create an amount from a count of minor units, e.g. `1875` for 18.75.
    pub fn from_minor_units(minor_units: i64) -> Self {
        Self(Decimal::new(minor_units, MINOR_UNIT_SCALE))
    }

    /// The amount as a count of minor units, or `None` if it overflows an `i64`.
    pub fn to_minor_units(self) -> Option<i64> {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|minor_units| minor_units.to_i64())
    }

    /// The amount as an exact decimal.
    pub fn value(self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = Error;

    /// Parse plain (`18.75`) or scientific (`1.875e1`) decimal notation.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value = Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| Error::InvalidAmount(s.to_owned()))?;

        Self::new(value)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Serialize::serialize(&self.0, serializer)
    }
}

impl ToSql for Amount {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let minor_units = self.to_minor_units().ok_or_else(|| {
            rusqlite::Error::ToSqlConversionFailure(Box::new(Error::InvalidAmount(
                self.to_string(),
            )))
        })?;

        Ok(ToSqlOutput::from(minor_units))
    }
}

impl FromSql for Amount {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_i64().map(Self::from_minor_units)
    }
}
