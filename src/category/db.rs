//! Database operations for categories.

use rusqlite::{Connection, Row, named_params};

use crate::{
    CompanyId, Error,
    category::{Category, CategoryId, CategoryName, CategoryType, NewCategory},
    reference::ReferenceKind,
};

/// Create a category and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::InvalidParentCategory] if `parent_id` does not refer to a
/// category of the same company and type.
pub fn create_category(category: NewCategory, connection: &Connection) -> Result<Category, Error> {
    if let Some(parent_id) = category.parent_id {
        match get_category(category.company_id, parent_id, connection) {
            Ok(parent) if parent.category_type == category.category_type => {}
            Ok(_) | Err(Error::NotFound) => {
                return Err(Error::InvalidParentCategory(Some(parent_id)));
            }
            Err(error) => return Err(error),
        }
    }

    connection.execute(
        "INSERT INTO category (company_id, name, type, parent_id) VALUES (?1, ?2, ?3, ?4);",
        (
            category.company_id,
            category.name.as_ref(),
            category.category_type.as_str(),
            category.parent_id,
        ),
    )?;

    let id = connection.last_insert_rowid();

    Ok(Category {
        id,
        company_id: category.company_id,
        name: category.name,
        category_type: category.category_type,
        parent_id: category.parent_id,
    })
}

/// Retrieve a single category of a company by ID.
pub fn get_category(
    company_id: CompanyId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "SELECT id, company_id, name, type, parent_id FROM category \
            WHERE id = :id AND company_id = :company_id;",
        )?
        .query_row(
            named_params! { ":id": category_id, ":company_id": company_id },
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve the direct sub-categories of a category ordered by ID.
pub fn get_children(
    company_id: CompanyId,
    parent_id: CategoryId,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, company_id, name, type, parent_id FROM category \
            WHERE parent_id = :parent_id AND company_id = :company_id ORDER BY id ASC;",
        )?
        .query_map(
            named_params! { ":parent_id": parent_id, ":company_id": company_id },
            map_row,
        )?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Retrieve every category of a company ordered by ID.
pub fn get_all_categories(
    company_id: CompanyId,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, company_id, name, type, parent_id FROM category \
            WHERE company_id = :company_id ORDER BY id ASC;",
        )?
        .query_map(named_params! { ":company_id": company_id }, map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Count the top-level categories of `category_type` for a company.
pub fn count_top_level_categories(
    company_id: CompanyId,
    category_type: CategoryType,
    connection: &Connection,
) -> Result<usize, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM category \
        WHERE company_id = :company_id AND type = :type AND parent_id IS NULL;",
        named_params! { ":company_id": company_id, ":type": category_type.as_str() },
        |row| row.get(0),
    )?;

    Ok(count as usize)
}

/// Count the records of `kind` that point at a category.
pub fn count_references(
    company_id: CompanyId,
    category_id: CategoryId,
    kind: ReferenceKind,
    connection: &Connection,
) -> Result<usize, Error> {
    let count: i64 = connection.query_row(
        kind.count_query(),
        named_params! { ":company_id": company_id, ":category_id": category_id },
        |row| row.get(0),
    )?;

    Ok(count as usize)
}

/// Delete a single category inside its own transaction.
///
/// Sub-categories are not touched, the caller is expected to have dealt
/// with them first.
///
/// # Errors
///
/// Returns [Error::DeleteMissingCategory] if the category does not exist,
/// e.g. because another request deleted it first.
pub fn delete_category(
    company_id: CompanyId,
    category_id: CategoryId,
    connection: &Connection,
) -> Result<(), Error> {
    // Using unchecked_transaction because we only have &Connection from the MutexGuard.
    let transaction = connection.unchecked_transaction()?;

    let rows_affected = transaction.execute(
        "DELETE FROM category WHERE id = :id AND company_id = :company_id",
        named_params! { ":id": category_id, ":company_id": company_id },
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingCategory);
    }

    transaction.commit()?;

    Ok(())
}

/// Initialize the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            company_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            parent_id INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_category_company_type ON category(company_id, type);
        CREATE INDEX IF NOT EXISTS idx_category_parent ON category(parent_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let company_id = row.get(1)?;
    let raw_name: String = row.get(2)?;
    let raw_type: String = row.get(3)?;
    let parent_id = row.get(4)?;

    let category_type = raw_type.parse().map_err(|error: Error| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(error))
    })?;

    Ok(Category {
        id,
        company_id,
        name: CategoryName::new_unchecked(&raw_name),
        category_type,
        parent_id,
    })
}
