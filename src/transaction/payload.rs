//! The JSON body used to create and edit transactions.

use serde::Deserialize;
use serde_json::Number;
use time_tz::Tz;

use crate::{Amount, CategoryId, Error, Timestamp, TransactionType, transaction::NewTransaction};

/// A number sent either as a JSON number or as a string, e.g. `18.75` or `"18.75"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(Number),
    Text(String),
}

impl NumericInput {
    fn to_amount(&self) -> Result<Amount, Error> {
        match self {
            Self::Number(number) => number.to_string().parse(),
            Self::Text(text) => text.parse(),
        }
    }

    fn to_category_id(&self) -> Result<CategoryId, Error> {
        match self {
            Self::Number(number) => number
                .as_i64()
                .ok_or_else(|| Error::InvalidCategoryId(number.to_string())),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| Error::InvalidCategoryId(text.to_owned())),
        }
    }
}

/// The JSON body for creating or editing a transaction.
///
/// Every field is optional here so that a missing field can be reported as
/// [Error::MissingFields] instead of a generic deserialization error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPayload {
    pub description: Option<String>,
    pub amount: Option<NumericInput>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub date: Option<String>,
    pub category_id: Option<NumericInput>,
}

impl TransactionPayload {
    /// Validate the payload.
    ///
    /// `timezone` is used to convert dates given with an explicit UTC
    /// offset into local time.
    ///
    /// # Errors
    /// Returns [Error::MissingFields] if any field is absent or `null`,
    /// otherwise the error for the first field that is invalid.
    pub fn into_new_transaction(self, timezone: &Tz) -> Result<NewTransaction, Error> {
        let (Some(description), Some(amount), Some(kind), Some(date), Some(category_id)) = (
            self.description,
            self.amount,
            self.kind,
            self.date,
            self.category_id,
        ) else {
            return Err(Error::MissingFields);
        };

        let description = description.trim();
        if description.is_empty() {
            return Err(Error::EmptyDescription);
        }

        Ok(NewTransaction {
            description: description.to_owned(),
            amount: amount.to_amount()?,
            kind: kind.parse::<TransactionType>()?,
            date: Timestamp::parse(&date, timezone)?,
            category_id: category_id.to_category_id()?,
        })
    }
}
