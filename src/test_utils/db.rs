use rusqlite::Connection;
use time::PrimitiveDateTime;

use crate::{
    Amount, CategoryColor, CategoryName, NewCategory, NewTransaction, Timestamp, TransactionType,
    category::Category, create_category, create_transaction, db::initialize,
    transaction::Transaction,
};

/// An in-memory database with all the application tables.
pub(crate) fn get_test_connection() -> Connection {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection).expect("Could not initialize database");
    connection
}

pub(crate) fn insert_category(
    name: &str,
    kind: TransactionType,
    connection: &Connection,
) -> Category {
    let new_category = NewCategory {
        name: CategoryName::new_unchecked(name),
        kind,
        color: CategoryColor::new("#33FF57").expect("Invalid test color"),
    };

    create_category(new_category, connection).expect("Could not create test category")
}

pub(crate) fn insert_transaction(
    description: &str,
    minor_units: i64,
    kind: TransactionType,
    date: PrimitiveDateTime,
    category: &Category,
    connection: &Connection,
) -> Transaction {
    let new_transaction = NewTransaction {
        description: description.to_owned(),
        amount: Amount::from_minor_units(minor_units),
        kind,
        date: Timestamp::new(date),
        category_id: category.id,
    };

    create_transaction(new_transaction, connection).expect("Could not create test transaction")
}
