//! Per-company settings.
//!
//! Settings are stored as key/value text pairs scoped to a company. The
//! deletion workflow only needs the default categories, but other settings
//! live in the same table.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension, named_params};

use crate::{CompanyId, Error, category::CategoryId};

/// A category that the company's configuration points at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultCategory {
    /// The category new income is filed under.
    Income,
    /// The category new expenses are filed under.
    Expense,
    /// The category used internally for transfers between accounts.
    Transfer,
}

impl DefaultCategory {
    /// The settings key that stores the category ID.
    pub fn key(&self) -> &'static str {
        match self {
            DefaultCategory::Income => "default.income_category",
            DefaultCategory::Expense => "default.expense_category",
            DefaultCategory::Transfer => "default.transfer_category",
        }
    }
}

/// Read access to a company's configuration.
pub trait Settings {
    /// Get the ID of a default category, if one is configured.
    fn default_category(
        &self,
        company_id: CompanyId,
        default: DefaultCategory,
    ) -> Result<Option<CategoryId>, Error>;
}

/// Reads company settings from a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteSettings {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteSettings {
    /// Create a settings reader for a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl Settings for SQLiteSettings {
    fn default_category(
        &self,
        company_id: CompanyId,
        default: DefaultCategory,
    ) -> Result<Option<CategoryId>, Error> {
        let connection = self
            .connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let value = get_setting(company_id, default.key(), &connection)?;

        Ok(value.and_then(|value| match value.parse() {
            Ok(id) => Some(id),
            Err(error) => {
                tracing::warn!(
                    "setting {} for company {company_id} is not a category ID ({value:?}): {error}",
                    default.key()
                );
                None
            }
        }))
    }
}

/// Get a setting for a company, `None` if it has not been set.
pub fn get_setting(
    company_id: CompanyId,
    key: &str,
    connection: &Connection,
) -> Result<Option<String>, Error> {
    connection
        .query_row(
            "SELECT value FROM setting WHERE company_id = :company_id AND key = :key;",
            named_params! { ":company_id": company_id, ":key": key },
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
}

/// Set a setting for a company, replacing any previous value.
pub fn set_setting(
    company_id: CompanyId,
    key: &str,
    value: &str,
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO setting (company_id, key, value) VALUES (?1, ?2, ?3)
        ON CONFLICT(company_id, key) DO UPDATE SET value = excluded.value;",
        (company_id, key, value),
    )?;

    Ok(())
}

/// Initialize the setting table.
pub fn create_setting_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS setting (
            id INTEGER PRIMARY KEY,
            company_id INTEGER NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            UNIQUE(company_id, key)
        )",
        (),
    )?;

    Ok(())
}
