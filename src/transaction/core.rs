//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::Serialize;

use crate::{
    Amount, CategoryId, Error, Timestamp, TransactionType, database_id::TransactionId,
};

// ============================================================================
// MODELS
// ============================================================================

/// An expense or income, i.e. an event where money was either spent or earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// A text description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned in this transaction.
    pub amount: Amount,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// When the transaction happened, in local time.
    pub date: Timestamp,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
}

/// The validated fields needed to create or replace a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// A non-empty description of what the transaction was for.
    pub description: String,
    /// The amount of money spent or earned.
    pub amount: Amount,
    /// Whether the money was earned or spent.
    pub kind: TransactionType,
    /// When the transaction happened, in local time.
    pub date: Timestamp,
    /// The category the transaction belongs to. It must refer to an existing category.
    pub category_id: CategoryId,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let category_id = transaction.category_id;

    connection
        .prepare(
            "INSERT INTO \"transaction\" (description, amount, type, date, category_id)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING id, description, amount, type, date, category_id",
        )?
        .query_row(
            (
                transaction.description,
                transaction.amount,
                transaction.kind,
                transaction.date,
                transaction.category_id,
            ),
            map_transaction_row,
        )
        .map_err(|error| map_write_error(error, category_id))
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, description, amount, type, date, category_id
             FROM \"transaction\" WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Replace every field of the transaction `id` and return the updated transaction.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingTransaction] if `id` does not refer to a valid transaction,
/// - [Error::InvalidCategory] if the category ID does not refer to a real category,
/// - or [Error::SqlError] there is some other SQL error.
pub fn update_transaction(
    id: TransactionId,
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let category_id = transaction.category_id;

    connection
        .prepare(
            "UPDATE \"transaction\"
             SET description = ?1, amount = ?2, type = ?3, date = ?4, category_id = ?5
             WHERE id = ?6
             RETURNING id, description, amount, type, date, category_id",
        )?
        .query_row(
            (
                transaction.description,
                transaction.amount,
                transaction.kind,
                transaction.date,
                transaction.category_id,
                id,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingTransaction,
            error => map_write_error(error, category_id),
        })
}

/// Delete the transaction `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::DeleteMissingTransaction] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn delete_transaction(id: TransactionId, connection: &Connection) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = :id", &[(":id", &id)])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            description TEXT NOT NULL,
            amount INTEGER NOT NULL CHECK (amount >= 0),
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            date TEXT NOT NULL,
            category_id INTEGER NOT NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE RESTRICT
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);
        CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(category_id);",
    )?;

    Ok(())
}

/// Map a database row of `id, description, amount, type, date, category_id` to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        description: row.get(1)?,
        amount: row.get(2)?,
        kind: row.get(3)?,
        date: row.get(4)?,
        category_id: row.get(5)?,
    })
}

fn map_write_error(error: rusqlite::Error, category_id: CategoryId) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: _,
                extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
            },
            _,
        ) => Error::InvalidCategory(category_id),
        error => error.into(),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use time::macros::datetime;

    use crate::{
        Amount, Error, Timestamp, TransactionType,
        test_utils::{get_test_connection, insert_category},
        transaction::{
            NewTransaction, create_transaction, delete_transaction, get_transaction,
            update_transaction,
        },
    };

    fn feijao(category_id: i64) -> NewTransaction {
        NewTransaction {
            description: "Feijão".to_owned(),
            amount: Amount::from_minor_units(1875),
            kind: TransactionType::Expense,
            date: Timestamp::new(datetime!(2024-03-05 10:30)),
            category_id,
        }
    }

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let category = insert_category("Mercado", TransactionType::Expense, &conn);

        let result = create_transaction(feijao(category.id), &conn);

        match result {
            Ok(transaction) => {
                assert!(transaction.id > 0);
                assert_eq!(transaction.description, "Feijão");
                assert_eq!(transaction.amount, Amount::from_minor_units(1875));
                assert_eq!(transaction.kind, TransactionType::Expense);
                assert_eq!(
                    transaction.date,
                    Timestamp::new(datetime!(2024-03-05 10:30))
                );
                assert_eq!(transaction.category_id, category.id);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let conn = get_test_connection();

        let result = create_transaction(feijao(42), &conn);

        assert_eq!(result, Err(Error::InvalidCategory(42)));
    }

    #[test]
    fn get_returns_created_transaction() {
        let conn = get_test_connection();
        let category = insert_category("Mercado", TransactionType::Expense, &conn);
        let created = create_transaction(feijao(category.id), &conn).unwrap();

        let got = get_transaction(created.id, &conn);

        assert_eq!(got, Ok(created));
    }

    #[test]
    fn get_missing_transaction_is_not_found() {
        let conn = get_test_connection();

        assert_eq!(get_transaction(1, &conn), Err(Error::NotFound));
    }

    #[test]
    fn update_replaces_all_fields() {
        let conn = get_test_connection();
        let mercado = insert_category("Mercado", TransactionType::Expense, &conn);
        let salario = insert_category("Salário", TransactionType::Income, &conn);
        let created = create_transaction(feijao(mercado.id), &conn).unwrap();
        let replacement = NewTransaction {
            description: "Salário Mensal".to_owned(),
            amount: Amount::from_minor_units(250000),
            kind: TransactionType::Income,
            date: Timestamp::new(datetime!(2024-03-01 09:00)),
            category_id: salario.id,
        };

        let updated = update_transaction(created.id, replacement, &conn).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.description, "Salário Mensal");
        assert_eq!(updated.amount, Amount::from_minor_units(250000));
        assert_eq!(updated.kind, TransactionType::Income);
        assert_eq!(updated.category_id, salario.id);
        assert_eq!(get_transaction(created.id, &conn), Ok(updated));
    }

    #[test]
    fn update_missing_transaction_fails() {
        let conn = get_test_connection();
        let category = insert_category("Mercado", TransactionType::Expense, &conn);

        let result = update_transaction(99, feijao(category.id), &conn);

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn update_with_invalid_category_fails() {
        let conn = get_test_connection();
        let category = insert_category("Mercado", TransactionType::Expense, &conn);
        let created = create_transaction(feijao(category.id), &conn).unwrap();

        let result = update_transaction(created.id, feijao(category.id + 10), &conn);

        assert_eq!(result, Err(Error::InvalidCategory(category.id + 10)));
    }

    #[test]
    fn delete_removes_transaction() {
        let conn = get_test_connection();
        let category = insert_category("Mercado", TransactionType::Expense, &conn);
        let created = create_transaction(feijao(category.id), &conn).unwrap();

        assert_eq!(delete_transaction(created.id, &conn), Ok(()));
        assert_eq!(get_transaction(created.id, &conn), Err(Error::NotFound));
    }

    #[test]
    fn delete_missing_transaction_fails() {
        let conn = get_test_connection();

        assert_eq!(
            delete_transaction(3, &conn),
            Err(Error::DeleteMissingTransaction)
        );
    }

    #[test]
    fn amount_check_constraint_rejects_negative_values() {
        let conn = get_test_connection();
        let category = insert_category("Mercado", TransactionType::Expense, &conn);

        let result = conn.execute(
            "INSERT INTO \"transaction\" (description, amount, type, date, category_id)
             VALUES ('x', -1, 'expense', '2024-03-05 00:00:00.000', ?1)",
            [category.id],
        );

        assert!(result.is_err());
    }
}
