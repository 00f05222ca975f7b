//! Products and services that a company sells or buys.

use rusqlite::Connection;

use crate::{CompanyId, Error, category::CategoryId};

/// Database identifier for an item.
pub type ItemId = i64;

/// The data needed to create an item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub company_id: CompanyId,
    pub name: String,
    /// Either "product" or "service".
    pub item_type: String,
    pub description: String,
    pub sale_price: f64,
    pub purchase_price: f64,
    pub category_id: Option<CategoryId>,
    pub enabled: bool,
}

impl NewItem {
    /// An enabled product without prices or description.
    pub fn new(company_id: CompanyId, name: &str, category_id: CategoryId) -> Self {
        Self {
            company_id,
            name: name.to_owned(),
            item_type: "product".to_owned(),
            description: String::new(),
            sale_price: 0.0,
            purchase_price: 0.0,
            category_id: Some(category_id),
            enabled: true,
        }
    }
}

/// Create an item and return its ID.
pub fn create_item(item: NewItem, connection: &Connection) -> Result<ItemId, Error> {
    connection.execute(
        "INSERT INTO item (
            company_id, name, type, description, sale_price, purchase_price, category_id, enabled
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
        (
            item.company_id,
            &item.name,
            &item.item_type,
            &item.description,
            item.sale_price,
            item.purchase_price,
            item.category_id,
            item.enabled,
        ),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Initialize the item table.
pub fn create_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS item (
            id INTEGER PRIMARY KEY,
            company_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            description TEXT NOT NULL,
            sale_price REAL NOT NULL,
            purchase_price REAL NOT NULL,
            category_id INTEGER,
            enabled INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}
