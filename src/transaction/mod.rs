//! Transactions: the incomes and expenses the dashboard summarises.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the validated `NewTransaction` used to write one
//! - Database functions for storing, filtering, and deleting transactions
//! - The JSON route handlers for the transaction API

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod get_endpoint;
mod list_endpoint;
mod payload;
mod query;

pub use core::{
    NewTransaction, Transaction, create_transaction, create_transaction_table, delete_transaction,
    get_transaction, map_transaction_row, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use edit_endpoint::edit_transaction_endpoint;
pub use get_endpoint::get_transaction_endpoint;
pub use list_endpoint::get_transactions_endpoint;
pub use payload::{NumericInput, TransactionPayload};
pub use query::{
    TransactionFilter, TransactionQuery, TransactionWithCategory, get_transaction_with_category,
    query_transactions,
};
