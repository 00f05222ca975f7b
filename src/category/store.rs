//! Defines the category store trait and its SQLite implementation.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::{
    CompanyId, Error,
    category::{
        Category, CategoryId, CategoryType,
        db::{
            count_references, count_top_level_categories, delete_category, get_category,
            get_children,
        },
    },
    reference::ReferenceKind,
};

/// Reads and deletes the categories of a company.
pub trait CategoryStore {
    /// Get a category by its ID.
    fn find(&self, company_id: CompanyId, category_id: CategoryId) -> Result<Category, Error>;

    /// Get the direct sub-categories of a category.
    fn children(
        &self,
        company_id: CompanyId,
        category_id: CategoryId,
    ) -> Result<Vec<Category>, Error>;

    /// Count the top-level categories of a type.
    fn count_top_level(
        &self,
        company_id: CompanyId,
        category_type: CategoryType,
    ) -> Result<usize, Error>;

    /// Count the records of `kind` that point at a category.
    fn count_references(
        &self,
        company_id: CompanyId,
        category_id: CategoryId,
        kind: ReferenceKind,
    ) -> Result<usize, Error>;

    /// Delete a single category atomically.
    fn delete(&self, company_id: CompanyId, category_id: CategoryId) -> Result<(), Error>;
}

/// Reads and deletes categories in a SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store with a SQLite database.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, Error> {
        self.connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)
    }
}

impl CategoryStore for SQLiteCategoryStore {
    fn find(&self, company_id: CompanyId, category_id: CategoryId) -> Result<Category, Error> {
        let connection = self.lock()?;
        get_category(company_id, category_id, &connection)
    }

    fn children(
        &self,
        company_id: CompanyId,
        category_id: CategoryId,
    ) -> Result<Vec<Category>, Error> {
        let connection = self.lock()?;
        get_children(company_id, category_id, &connection)
    }

    fn count_top_level(
        &self,
        company_id: CompanyId,
        category_type: CategoryType,
    ) -> Result<usize, Error> {
        let connection = self.lock()?;
        count_top_level_categories(company_id, category_type, &connection)
    }

    fn count_references(
        &self,
        company_id: CompanyId,
        category_id: CategoryId,
        kind: ReferenceKind,
    ) -> Result<usize, Error> {
        let connection = self.lock()?;
        count_references(company_id, category_id, kind, &connection)
    }

    /// Delete the category in its own SQL transaction.
    ///
    /// # Errors
    /// Returns [Error::DeleteMissingCategory] if no row was deleted.
    fn delete(&self, company_id: CompanyId, category_id: CategoryId) -> Result<(), Error> {
        let connection = self.lock()?;
        delete_category(company_id, category_id, &connection)
    }
}

#[cfg(test)]
mod sqlite_category_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        category::{CategoryName, CategoryType, NewCategory, create_category},
        db::initialize,
    };

    use super::{CategoryStore, SQLiteCategoryStore};

    fn get_test_store() -> (SQLiteCategoryStore, Arc<Mutex<Connection>>) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        (SQLiteCategoryStore::new(connection.clone()), connection)
    }

    #[test]
    fn find_returns_created_category() {
        let (store, connection) = get_test_store();
        let category = create_category(
            NewCategory {
                company_id: 1,
                name: CategoryName::new_unchecked("Sales"),
                category_type: CategoryType::Income,
                parent_id: None,
            },
            &connection.lock().unwrap(),
        )
        .unwrap();

        assert_eq!(store.find(1, category.id), Ok(category));
    }

    #[test]
    fn delete_missing_category_fails() {
        let (store, _connection) = get_test_store();

        assert_eq!(store.delete(1, 999), Err(Error::DeleteMissingCategory));
    }

    #[test]
    fn poisoned_lock_returns_lock_error() {
        let (store, connection) = get_test_store();
        let _ = std::thread::spawn(move || {
            let _guard = connection.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(store.find(1, 1), Err(Error::DatabaseLockError));
    }
}
