//! Banking transactions.
//!
//! Only what the category workflow and the transaction export need lives
//! here: the table, creating transactions and the transaction types.

use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{CompanyId, Error, category::CategoryId};

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// The kind of a banking transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionType {
    /// Money received.
    Income,
    /// Money received from another account of the company.
    IncomeTransfer,
    /// Part of a received payment that was split over several categories.
    IncomeSplit,
    /// A template for income that repeats.
    IncomeRecurring,
    /// Money paid.
    Expense,
    /// Money sent to another account of the company.
    ExpenseTransfer,
    /// Part of a payment that was split over several categories.
    ExpenseSplit,
    /// A template for an expense that repeats.
    ExpenseRecurring,
}

impl TransactionType {
    /// Every transaction type, in the order they are offered to users.
    pub const ALL: &'static [TransactionType] = &[
        TransactionType::Income,
        TransactionType::IncomeTransfer,
        TransactionType::IncomeSplit,
        TransactionType::IncomeRecurring,
        TransactionType::Expense,
        TransactionType::ExpenseTransfer,
        TransactionType::ExpenseSplit,
        TransactionType::ExpenseRecurring,
    ];

    /// The name stored in the database and shown in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::IncomeTransfer => "income-transfer",
            TransactionType::IncomeSplit => "income-split",
            TransactionType::IncomeRecurring => "income-recurring",
            TransactionType::Expense => "expense",
            TransactionType::ExpenseTransfer => "expense-transfer",
            TransactionType::ExpenseSplit => "expense-split",
            TransactionType::ExpenseRecurring => "expense-recurring",
        }
    }
}

/// The data needed to create a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub company_id: CompanyId,
    pub transaction_type: TransactionType,
    pub number: String,
    pub paid_at: Date,
    pub amount: f64,
    pub currency_code: String,
    pub currency_rate: f64,
    pub account_name: String,
    /// The invoice or bill the transaction pays, if any.
    pub document_id: Option<i64>,
    pub contact_email: Option<String>,
    pub category_id: CategoryId,
    pub description: String,
    pub payment_method: String,
    pub reference: Option<String>,
    pub reconciled: bool,
    /// The recurring transaction this one was created from, if any.
    pub parent_id: Option<TransactionId>,
}

impl NewTransaction {
    /// A cash expense paid today in USD, with everything optional left empty.
    pub fn expense(company_id: CompanyId, category_id: CategoryId, amount: f64) -> Self {
        Self {
            company_id,
            transaction_type: TransactionType::Expense,
            number: String::new(),
            paid_at: OffsetDateTime::now_utc().date(),
            amount,
            currency_code: "USD".to_owned(),
            currency_rate: 1.0,
            account_name: "Cash".to_owned(),
            document_id: None,
            contact_email: None,
            category_id,
            description: String::new(),
            payment_method: "cash".to_owned(),
            reference: None,
            reconciled: false,
            parent_id: None,
        }
    }
}

/// Create a transaction and return its ID.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<TransactionId, Error> {
    connection.execute(
        "INSERT INTO \"transaction\" (
            company_id, type, number, paid_at, amount, currency_code, currency_rate,
            account_name, document_id, contact_email, category_id, description,
            payment_method, reference, reconciled, parent_id
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16);",
        rusqlite::params![
            transaction.company_id,
            transaction.transaction_type.as_str(),
            transaction.number,
            transaction.paid_at,
            transaction.amount,
            transaction.currency_code,
            transaction.currency_rate,
            transaction.account_name,
            transaction.document_id,
            transaction.contact_email,
            transaction.category_id,
            transaction.description,
            transaction.payment_method,
            transaction.reference,
            transaction.reconciled,
            transaction.parent_id,
        ],
    )?;

    Ok(connection.last_insert_rowid())
}

/// Initialize the transaction table and indexes.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            company_id INTEGER NOT NULL,
            type TEXT NOT NULL,
            number TEXT NOT NULL,
            paid_at TEXT NOT NULL,
            amount REAL NOT NULL,
            currency_code TEXT NOT NULL,
            currency_rate REAL NOT NULL,
            account_name TEXT NOT NULL,
            document_id INTEGER,
            contact_email TEXT,
            category_id INTEGER NOT NULL,
            description TEXT NOT NULL,
            payment_method TEXT NOT NULL,
            reference TEXT,
            reconciled INTEGER NOT NULL,
            parent_id INTEGER
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_category ON \"transaction\"(company_id, category_id);",
    )?;

    Ok(())
}

#[cfg(test)]
mod create_transaction_tests {
    use rusqlite::Connection;

    use crate::db::initialize;

    use super::{NewTransaction, TransactionType, create_transaction};

    #[test]
    fn create_transaction_returns_new_id() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        let first = create_transaction(NewTransaction::expense(1, 1, 10.0), &connection).unwrap();
        let second = create_transaction(
            NewTransaction {
                transaction_type: TransactionType::Income,
                ..NewTransaction::expense(1, 1, 20.0)
            },
            &connection,
        )
        .unwrap();

        assert!(first > 0);
        assert_eq!(second, first + 1);
    }

    #[test]
    fn type_names_are_unique() {
        let mut names: Vec<&str> = TransactionType::ALL.iter().map(|t| t.as_str()).collect();
        names.sort();
        names.dedup();

        assert_eq!(names.len(), TransactionType::ALL.len());
    }
}
