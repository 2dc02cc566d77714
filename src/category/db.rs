//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    CategoryId, Error,
    category::{Category, CategoryColor, CategoryName, NewCategory},
};

/// Create a category and return it with its generated ID.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    connection.execute(
        "INSERT INTO category (name, type, color) VALUES (?1, ?2, ?3);",
        (category.name.as_ref(), category.kind, category.color.as_ref()),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        name: category.name,
        kind: category.kind,
        color: category.color,
    })
}

/// Retrieve a single category by ID.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, name, type, color FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_category_row)
        .map_err(|error| error.into())
}

/// Retrieve all categories ordered alphabetically by name.
pub fn get_all_categories(connection: &Connection) -> Result<Vec<Category>, Error> {
    connection
        .prepare("SELECT id, name, type, color FROM category ORDER BY name ASC, id ASC;")?
        .query_map([], map_category_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Replace the fields of a category and return the updated category.
///
/// # Errors
/// Returns [Error::UpdateMissingCategory] if the category doesn't exist.
pub fn update_category(
    category_id: CategoryId,
    category: NewCategory,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "UPDATE category SET name = ?1, type = ?2, color = ?3 WHERE id = ?4
             RETURNING id, name, type, color",
        )?
        .query_row(
            (
                category.name.as_ref(),
                category.kind,
                category.color.as_ref(),
                category_id,
            ),
            map_category_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingCategory,
            error => error.into(),
        })
}

/// Delete a category by ID.
///
/// # Errors
/// Returns [Error::DeleteMissingCategory] if the category doesn't exist, or
/// [Error::CategoryInUse] if transactions still belong to it.
pub fn delete_category(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let in_use: bool = connection.query_row(
        "SELECT EXISTS(SELECT 1 FROM \"transaction\" WHERE category_id = ?1)",
        [category_id],
        |row| row.get(0),
    )?;

    if in_use {
        return Err(Error::CategoryInUse(category_id));
    }

    // The RESTRICT foreign key still guards against a transaction written in between.
    let rows_affected = connection
        .execute("DELETE FROM category WHERE id = ?1", [category_id])
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: rusqlite::ErrorCode::ConstraintViolation,
                    ..
                },
                _,
            ) => Error::CategoryInUse(category_id),
            error => error.into(),
        })?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    Ok(())
}

/// Initialize the category table.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
            color TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_category_name ON category(name);",
    )?;

    Ok(())
}

/// Map a row of `id, name, type, color` starting at column `offset` to a category.
pub(crate) fn map_category_row_with_offset(
    row: &Row,
    offset: usize,
) -> Result<Category, rusqlite::Error> {
    let id = row.get(offset)?;
    let raw_name: String = row.get(offset + 1)?;
    let kind = row.get(offset + 2)?;
    let raw_color: String = row.get(offset + 3)?;

    Ok(Category {
        id,
        name: CategoryName::new_unchecked(&raw_name),
        kind,
        color: CategoryColor::new_unchecked(&raw_color),
    })
}

fn map_category_row(row: &Row) -> Result<Category, rusqlite::Error> {
    map_category_row_with_offset(row, 0)
}
