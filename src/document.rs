//! Invoices and bills.

use rusqlite::Connection;

use crate::{CompanyId, Error, category::CategoryId};

/// Database identifier for a document.
pub type DocumentId = i64;

/// Whether a document was sent or received.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentType {
    /// Sent to a customer.
    Invoice,
    /// Received from a vendor.
    Bill,
}

impl DocumentType {
    /// The name stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::Bill => "bill",
        }
    }
}

/// The data needed to create a document.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub company_id: CompanyId,
    pub document_type: DocumentType,
    pub document_number: String,
    pub category_id: CategoryId,
}

impl NewDocument {
    /// Create the data for a document.
    pub fn new(
        company_id: CompanyId,
        document_type: DocumentType,
        document_number: &str,
        category_id: CategoryId,
    ) -> Self {
        Self {
            company_id,
            document_type,
            document_number: document_number.to_owned(),
            category_id,
        }
    }
}

/// Create a document and return its ID.
pub fn create_document(document: NewDocument, connection: &Connection) -> Result<DocumentId, Error> {
    connection.execute(
        "INSERT INTO document (company_id, type, document_number, category_id)
        VALUES (?1, ?2, ?3, ?4);",
        (
            document.company_id,
            document.document_type.as_str(),
            &document.document_number,
            document.category_id,
        ),
    )?;

    Ok(connection.last_insert_rowid())
}

/// Initialize the document table.
pub fn create_document_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS document (
            id INTEGER PRIMARY KEY,
            company_id INTEGER NOT NULL,
            type TEXT NOT NULL,
            document_number TEXT NOT NULL,
            category_id INTEGER NOT NULL
        )",
        (),
    )?;

    Ok(())
}
