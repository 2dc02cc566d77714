//! Filtered transaction listings with each transaction's category attached.

use rusqlite::{Connection, Row, ToSql, params_from_iter};
use serde::{Deserialize, Serialize};
use time_tz::Tz;

use crate::{
    Amount, Error, Timestamp, TransactionType,
    category::{Category, map_category_row_with_offset},
    database_id::TransactionId,
    transaction::{Transaction, map_transaction_row},
};

const SELECT_WITH_CATEGORY: &str = "SELECT
        t.id, t.description, t.amount, t.type, t.date, t.category_id,
        c.id, c.name, c.type, c.color
    FROM \"transaction\" t
    INNER JOIN category c ON c.id = t.category_id";

/// A transaction together with the category it belongs to.
///
/// Serializes as the transaction's fields plus a nested `category` object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionWithCategory {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub category: Category,
}

/// Conditions that listed transactions must all satisfy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionFilter {
    pub kind: Option<TransactionType>,
    /// The exact name of the transaction's category.
    pub category_name: Option<String>,
    /// Inclusive lower bound on the transaction date.
    pub start: Option<Timestamp>,
    /// Inclusive upper bound on the transaction date.
    pub end: Option<Timestamp>,
    pub min_amount: Option<Amount>,
    pub max_amount: Option<Amount>,
}

/// The query string accepted by the transaction listing, e.g.
/// `?type=expense&category=Mercado&startDate=2024-03-01&maxAmount=20`.
///
/// Empty values are treated as if the parameter was not given.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub min_amount: Option<String>,
    pub max_amount: Option<String>,
}

impl TransactionQuery {
    /// Validate the query parameters.
    ///
    /// A plain `endDate` such as `2024-03-31` includes the whole of that day.
    ///
    /// # Errors
    /// Returns [Error::InvalidTransactionType], [Error::InvalidDate] or
    /// [Error::InvalidAmount] for the first parameter that cannot be parsed.
    pub fn into_filter(self, timezone: &Tz) -> Result<TransactionFilter, Error> {
        Ok(TransactionFilter {
            kind: non_empty(self.kind)
                .map(|kind| kind.parse::<TransactionType>())
                .transpose()?,
            category_name: non_empty(self.category),
            start: non_empty(self.start_date)
                .map(|date| Timestamp::parse(&date, timezone))
                .transpose()?,
            end: non_empty(self.end_date)
                .map(|date| Timestamp::parse_inclusive_end(&date, timezone))
                .transpose()?,
            min_amount: non_empty(self.min_amount)
                .map(|amount| amount.parse::<Amount>())
                .transpose()?,
            max_amount: non_empty(self.max_amount)
                .map(|amount| amount.parse::<Amount>())
                .transpose()?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Get the transactions matching `filter`, newest first.
///
/// Transactions on the same date are ordered by descending ID so that the
/// order is stable.
///
/// # Errors
/// Returns [Error::SqlError] if the query fails.
pub fn query_transactions(
    filter: &TransactionFilter,
    connection: &Connection,
) -> Result<Vec<TransactionWithCategory>, Error> {
    let mut conditions: Vec<&str> = Vec::new();
    let mut params: Vec<&dyn ToSql> = Vec::new();

    if let Some(kind) = &filter.kind {
        conditions.push("t.type = ?");
        params.push(kind);
    }
    if let Some(category_name) = &filter.category_name {
        conditions.push("c.name = ?");
        params.push(category_name);
    }
    if let Some(start) = &filter.start {
        conditions.push("t.date >= ?");
        params.push(start);
    }
    if let Some(end) = &filter.end {
        conditions.push("t.date <= ?");
        params.push(end);
    }
    if let Some(min_amount) = &filter.min_amount {
        conditions.push("t.amount >= ?");
        params.push(min_amount);
    }
    if let Some(max_amount) = &filter.max_amount {
        conditions.push("t.amount <= ?");
        params.push(max_amount);
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };
    let query = format!("{SELECT_WITH_CATEGORY} {where_clause} ORDER BY t.date DESC, t.id DESC");

    connection
        .prepare(&query)?
        .query_map(params_from_iter(params), map_row_with_category)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Retrieve a transaction and its category by the transaction's `id`.
///
/// # Errors
/// Returns [Error::NotFound] if `id` does not refer to a valid transaction.
pub fn get_transaction_with_category(
    id: TransactionId,
    connection: &Connection,
) -> Result<TransactionWithCategory, Error> {
    let transaction = connection
        .prepare(&format!("{SELECT_WITH_CATEGORY} WHERE t.id = :id"))?
        .query_row(&[(":id", &id)], map_row_with_category)?;

    Ok(transaction)
}

fn map_row_with_category(row: &Row) -> Result<TransactionWithCategory, rusqlite::Error> {
    Ok(TransactionWithCategory {
        transaction: map_transaction_row(row)?,
        category: map_category_row_with_offset(row, 6)?,
    })
}

#[cfg(test)]
mod query_tests {
    use rusqlite::Connection;
    use serde_json::json;
    use time::macros::datetime;

    use crate::{
        Amount, Error, Timestamp, TransactionType,
        category::Category,
        test_utils::{get_test_connection, get_timezone, insert_category, insert_transaction},
    };

    use super::{
        TransactionFilter, TransactionQuery, get_transaction_with_category, query_transactions,
    };

    struct Fixture {
        connection: Connection,
        mercado: Category,
        salario: Category,
    }

    /// Three expenses in March and a salary at the start of April.
    fn fixture() -> Fixture {
        let connection = get_test_connection();
        let mercado = insert_category("Mercado", TransactionType::Expense, &connection);
        let salario = insert_category("Salário", TransactionType::Income, &connection);

        insert_transaction(
            "Feijão",
            1875,
            TransactionType::Expense,
            datetime!(2024-03-05 10:00),
            &mercado,
            &connection,
        );
        insert_transaction(
            "Macarrão",
            1475,
            TransactionType::Expense,
            datetime!(2024-03-05 10:00),
            &mercado,
            &connection,
        );
        insert_transaction(
            "Biscoito Negresco",
            275,
            TransactionType::Expense,
            datetime!(2024-03-31 23:30),
            &mercado,
            &connection,
        );
        insert_transaction(
            "Salário Mensal",
            250000,
            TransactionType::Income,
            datetime!(2024-04-01 09:00),
            &salario,
            &connection,
        );

        Fixture {
            connection,
            mercado,
            salario,
        }
    }

    fn descriptions(filter: &TransactionFilter, connection: &Connection) -> Vec<String> {
        query_transactions(filter, connection)
            .expect("Could not query transactions")
            .into_iter()
            .map(|row| row.transaction.description)
            .collect()
    }

    #[test]
    fn no_filter_returns_newest_first() {
        let Fixture { connection, .. } = fixture();

        let got = descriptions(&TransactionFilter::default(), &connection);

        // Feijão and Macarrão share a date, so the later insert comes first.
        assert_eq!(
            got,
            vec!["Salário Mensal", "Biscoito Negresco", "Macarrão", "Feijão"]
        );
    }

    #[test]
    fn embeds_category() {
        let Fixture {
            connection,
            salario,
            ..
        } = fixture();
        let filter = TransactionFilter {
            kind: Some(TransactionType::Income),
            ..Default::default()
        };

        let got = query_transactions(&filter, &connection).unwrap();

        assert_eq!(got.len(), 1);
        assert_eq!(got[0].category, salario);
    }

    #[test]
    fn filters_by_type_and_category_name() {
        let Fixture { connection, .. } = fixture();

        let expenses = TransactionFilter {
            kind: Some(TransactionType::Expense),
            ..Default::default()
        };
        assert_eq!(descriptions(&expenses, &connection).len(), 3);

        let salario = TransactionFilter {
            category_name: Some("Salário".to_owned()),
            ..Default::default()
        };
        assert_eq!(descriptions(&salario, &connection), vec!["Salário Mensal"]);

        let unknown = TransactionFilter {
            category_name: Some("Limpeza".to_owned()),
            ..Default::default()
        };
        assert!(descriptions(&unknown, &connection).is_empty());
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let Fixture { connection, .. } = fixture();
        let query = TransactionQuery {
            start_date: Some("2024-03-05".to_owned()),
            end_date: Some("2024-03-31".to_owned()),
            ..Default::default()
        };
        let filter = query.into_filter(get_timezone("Etc/UTC")).unwrap();

        let got = descriptions(&filter, &connection);

        assert_eq!(got, vec!["Biscoito Negresco", "Macarrão", "Feijão"]);
    }

    #[test]
    fn amount_bounds_are_inclusive() {
        let Fixture { connection, .. } = fixture();
        let filter = TransactionFilter {
            min_amount: Some(Amount::from_minor_units(1475)),
            max_amount: Some(Amount::from_minor_units(1875)),
            ..Default::default()
        };

        let got = descriptions(&filter, &connection);

        assert_eq!(got, vec!["Macarrão", "Feijão"]);
    }

    #[test]
    fn get_with_category_returns_transaction() {
        let Fixture {
            connection,
            mercado,
            ..
        } = fixture();

        let got = get_transaction_with_category(1, &connection).unwrap();

        assert_eq!(got.transaction.description, "Feijão");
        assert_eq!(got.category, mercado);
    }

    #[test]
    fn get_missing_with_category_is_not_found() {
        let Fixture { connection, .. } = fixture();

        assert_eq!(
            get_transaction_with_category(404, &connection),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn query_ignores_empty_values() {
        let query = TransactionQuery {
            kind: Some(String::new()),
            category: Some("  ".to_owned()),
            ..Default::default()
        };

        assert_eq!(
            query.into_filter(get_timezone("Etc/UTC")),
            Ok(TransactionFilter::default())
        );
    }

    #[test]
    fn query_parses_every_parameter() {
        let query = TransactionQuery {
            kind: Some("expense".to_owned()),
            category: Some("Mercado".to_owned()),
            start_date: Some("2024-03-01T00:00:00Z".to_owned()),
            end_date: Some("2024-03-31".to_owned()),
            min_amount: Some("2.75".to_owned()),
            max_amount: Some("20".to_owned()),
        };

        let got = query.into_filter(get_timezone("America/Sao_Paulo"));

        assert_eq!(
            got,
            Ok(TransactionFilter {
                kind: Some(TransactionType::Expense),
                category_name: Some("Mercado".to_owned()),
                start: Some(Timestamp::new(datetime!(2024-02-29 21:00))),
                end: Some(Timestamp::new(datetime!(2024-03-31 23:59:59.999))),
                min_amount: Some(Amount::from_minor_units(275)),
                max_amount: Some(Amount::from_minor_units(2000)),
            })
        );
    }

    #[test]
    fn query_rejects_invalid_values() {
        let bad_type = TransactionQuery {
            kind: Some("transfer".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            bad_type.into_filter(get_timezone("Etc/UTC")),
            Err(Error::InvalidTransactionType("transfer".to_owned()))
        );

        let bad_amount = TransactionQuery {
            min_amount: Some("ten".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            bad_amount.into_filter(get_timezone("Etc/UTC")),
            Err(Error::InvalidAmount("ten".to_owned()))
        );

        let bad_date = TransactionQuery {
            end_date: Some("31/03/2024".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            bad_date.into_filter(get_timezone("Etc/UTC")),
            Err(Error::InvalidDate("31/03/2024".to_owned()))
        );
    }

    #[test]
    fn serializes_with_nested_category() {
        let Fixture { connection, .. } = fixture();
        let transaction = get_transaction_with_category(4, &connection).unwrap();

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(
            json,
            json!({
                "id": 4,
                "description": "Salário Mensal",
                "amount": 2500.0,
                "type": "income",
                "date": "2024-04-01T09:00:00.000",
                "categoryId": transaction.category.id,
                "category": {
                    "id": transaction.category.id,
                    "name": "Salário",
                    "type": "income",
                    "color": "#33FF57",
                },
            })
        );
    }
}
