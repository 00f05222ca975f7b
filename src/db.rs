//! Database initialization.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{
    Error, category::create_category_table, document::create_document_table,
    item::create_item_table, settings::create_setting_table,
    transaction::create_transaction_table,
};

/// Create the tables for every model in one exclusive transaction.
///
/// Calling this on an initialized database is a no-op.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_item_table(&transaction)?;
    create_document_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_setting_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

#[cfg(test)]
mod initialize_tests {
    use rusqlite::Connection;

    use super::initialize;

    #[test]
    fn creates_all_tables() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        let mut tables: Vec<String> = connection
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        tables.sort();

        assert_eq!(
            tables,
            vec!["category", "document", "item", "setting", "transaction"]
        );
    }

    #[test]
    fn initialize_twice_succeeds() {
        let connection = Connection::open_in_memory().unwrap();

        initialize(&connection).unwrap();

        assert_eq!(initialize(&connection), Ok(()));
    }
}
