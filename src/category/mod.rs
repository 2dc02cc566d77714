//! Categories for grouping transactions as income or expenses.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod list;

pub use create::create_category_endpoint;
pub use db::{
    create_category, create_category_table, delete_category, get_all_categories, get_category,
    update_category,
};
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryColor, CategoryName, CategoryPayload, NewCategory};
pub use edit::update_category_endpoint;
pub use list::get_categories_endpoint;

pub(crate) use db::map_category_row_with_offset;
