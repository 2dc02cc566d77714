//! Core category domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{CategoryId, Error, TransactionType};

/// A validated, non-empty category name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Hash)]
#[serde(transparent)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyCategoryName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyCategoryName)
        } else {
            Ok(Self(name.to_owned()))
        }
    }

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty, e.g. because it
    /// was read back from the database.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for CategoryName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CategoryName::new(s)
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A display color in the form `#RRGGBB`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Hash)]
#[serde(transparent)]
pub struct CategoryColor(String);

impl CategoryColor {
    /// Create a category color from a hex string such as `#33FF57`.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::InvalidColor] if `color` is not
    /// a `#` followed by exactly six hexadecimal digits.
    pub fn new(color: &str) -> Result<Self, Error> {
        let color = color.trim();

        let is_valid = color
            .strip_prefix('#')
            .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()));

        if is_valid {
            Ok(Self(color.to_owned()))
        } else {
            Err(Error::InvalidColor(color.to_owned()))
        }
    }

    /// Create a category color without validation.
    pub fn new_unchecked(color: &str) -> Self {
        Self(color.to_owned())
    }
}

impl AsRef<str> for CategoryColor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A category for grouping transactions (e.g., 'Mercado', 'Salário').
///
/// A category is either for income or for expenses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Hash)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub color: CategoryColor,
}

/// The validated fields needed to create or replace a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    /// The name of the category.
    pub name: CategoryName,
    /// Whether the category groups income or expenses.
    pub kind: TransactionType,
    /// The color used when displaying the category.
    pub color: CategoryColor,
}

/// The JSON body for creating or editing a category.
///
/// Every field is optional here so that a missing field can be reported as
/// [Error::MissingFields] instead of a generic deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryPayload {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub color: Option<String>,
}

impl TryFrom<CategoryPayload> for NewCategory {
    type Error = Error;

    fn try_from(payload: CategoryPayload) -> Result<Self, Self::Error> {
        let (Some(name), Some(kind), Some(color)) = (payload.name, payload.kind, payload.color)
        else {
            return Err(Error::MissingFields);
        };

        Ok(Self {
            name: CategoryName::new(&name)?,
            kind: kind.parse()?,
            color: CategoryColor::new(&color)?,
        })
    }
}
