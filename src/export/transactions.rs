use rusqlite::{Connection, Row, named_params};
use time::Date;

use crate::{
    CompanyId, Error,
    export::{Cell, Export},
    transaction::TransactionId,
};

/// Exports a company's banking transactions, most recent first.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionsExport {
    /// The company whose transactions are exported.
    pub company_id: CompanyId,
    /// Only export these transactions, or all of them if `None`.
    pub ids: Option<Vec<TransactionId>>,
}

/// A transaction joined with the names it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    id: TransactionId,
    transaction_type: String,
    number: String,
    paid_at: Date,
    amount: f64,
    currency_code: String,
    currency_rate: f64,
    account_name: String,
    document_number: Option<String>,
    contact_email: Option<String>,
    category_name: Option<String>,
    description: String,
    payment_method: String,
    reference: Option<String>,
    reconciled: bool,
    parent_number: Option<String>,
}

impl Export for TransactionsExport {
    type Record = TransactionRecord;

    fn title(&self) -> &'static str {
        "transactions"
    }

    fn fields(&self) -> &'static [&'static str] {
        &[
            "type",
            "number",
            "paid_at",
            "amount",
            "currency_code",
            "currency_rate",
            "account_name",
            "invoice_bill_number",
            "contact_email",
            "category_name",
            "description",
            "payment_method",
            "reference",
            "reconciled",
            "parent_number",
        ]
    }

    fn collection(&self, connection: &Connection) -> Result<Vec<TransactionRecord>, Error> {
        // Only recurring parents are reported, split parents are not.
        let records: Vec<TransactionRecord> = connection
            .prepare(
                "SELECT t.id, t.type, t.number, t.paid_at, t.amount, t.currency_code, t.currency_rate,
                    t.account_name, d.document_number, t.contact_email, c.name, t.description,
                    t.payment_method, t.reference, t.reconciled, p.number
                FROM \"transaction\" t
                LEFT JOIN document d ON d.id = t.document_id AND d.company_id = t.company_id
                LEFT JOIN category c ON c.id = t.category_id AND c.company_id = t.company_id
                LEFT JOIN \"transaction\" p ON p.id = t.parent_id AND p.company_id = t.company_id
                    AND p.type LIKE '%-recurring'
                WHERE t.company_id = :company_id
                ORDER BY t.paid_at DESC, t.id DESC;",
            )?
            .query_map(named_params! { ":company_id": self.company_id }, map_row)?
            .collect::<Result<_, _>>()?;

        Ok(match &self.ids {
            Some(ids) => records
                .into_iter()
                .filter(|record| ids.contains(&record.id))
                .collect(),
            None => records,
        })
    }

    fn map(&self, record: &TransactionRecord) -> Vec<Cell> {
        vec![
            Cell::Text(record.transaction_type.clone()),
            Cell::Text(record.number.clone()),
            Cell::Date(record.paid_at),
            Cell::Decimal(record.amount),
            Cell::Text(record.currency_code.clone()),
            Cell::Decimal(record.currency_rate),
            Cell::Text(record.account_name.clone()),
            record
                .document_number
                .clone()
                .map_or(Cell::Integer(0), Cell::Text),
            Cell::from(record.contact_email.clone()),
            Cell::from(record.category_name.clone()),
            Cell::Text(record.description.clone()),
            Cell::Text(record.payment_method.clone()),
            Cell::from(record.reference.clone()),
            Cell::Bool(record.reconciled),
            Cell::from(record.parent_number.clone()),
        ]
    }
}

fn map_row(row: &Row) -> Result<TransactionRecord, rusqlite::Error> {
    Ok(TransactionRecord {
        id: row.get(0)?,
        transaction_type: row.get(1)?,
        number: row.get(2)?,
        paid_at: row.get(3)?,
        amount: row.get(4)?,
        currency_code: row.get(5)?,
        currency_rate: row.get(6)?,
        account_name: row.get(7)?,
        document_number: row.get(8)?,
        contact_email: row.get(9)?,
        category_name: row.get(10)?,
        description: row.get(11)?,
        payment_method: row.get(12)?,
        reference: row.get(13)?,
        reconciled: row.get(14)?,
        parent_number: row.get(15)?,
    })
}

#[cfg(test)]
mod transactions_export_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        category::{CategoryName, CategoryType, NewCategory, create_category},
        db::initialize,
        document::{DocumentType, NewDocument, create_document},
        export::write_csv,
        transaction::{NewTransaction, TransactionType, create_transaction},
    };

    use super::TransactionsExport;

    const COMPANY: i64 = 1;

    fn get_test_connection() -> (Connection, i64) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let category = create_category(
            NewCategory {
                company_id: COMPANY,
                name: CategoryName::new_unchecked("Office"),
                category_type: CategoryType::Expense,
                parent_id: None,
            },
            &connection,
        )
        .unwrap();

        (connection, category.id)
    }

    fn export(export: &TransactionsExport, connection: &Connection) -> Vec<String> {
        let mut buffer = Vec::new();
        write_csv(export, connection, &mut buffer).unwrap();

        String::from_utf8(buffer)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    #[test]
    fn exports_newest_first_with_joined_names() {
        let (connection, category_id) = get_test_connection();
        let bill_id = create_document(
            NewDocument::new(COMPANY, DocumentType::Bill, "BILL-7", category_id),
            &connection,
        )
        .unwrap();
        create_transaction(
            NewTransaction {
                number: "TRA-1".to_owned(),
                paid_at: date!(2024 - 01 - 15),
                description: "=HYPERLINK(\"x\")".to_owned(),
                ..NewTransaction::expense(COMPANY, category_id, 10.0)
            },
            &connection,
        )
        .unwrap();
        create_transaction(
            NewTransaction {
                number: "TRA-2".to_owned(),
                paid_at: date!(2024 - 02 - 01),
                document_id: Some(bill_id),
                contact_email: Some("vendor@example.com".to_owned()),
                reconciled: true,
                ..NewTransaction::expense(COMPANY, category_id, 99.5)
            },
            &connection,
        )
        .unwrap();

        let lines = export(
            &TransactionsExport {
                company_id: COMPANY,
                ids: None,
            },
            &connection,
        );

        assert_eq!(
            lines,
            vec![
                "type,number,paid_at,amount,currency_code,currency_rate,account_name,\
                invoice_bill_number,contact_email,category_name,description,payment_method,\
                reference,reconciled,parent_number",
                "expense,TRA-2,2024-02-01,99.5,USD,1,Cash,BILL-7,vendor@example.com,Office,,cash,,1,",
                "expense,TRA-1,2024-01-15,10,USD,1,Cash,0,,Office,\"'=HYPERLINK(\"\"x\"\")\",cash,,0,",
            ]
        );
    }

    #[test]
    fn parent_number_is_only_set_for_recurring_parents() {
        let (connection, category_id) = get_test_connection();
        let recurring_id = create_transaction(
            NewTransaction {
                transaction_type: TransactionType::ExpenseRecurring,
                number: "REC-1".to_owned(),
                paid_at: date!(2024 - 01 - 01),
                ..NewTransaction::expense(COMPANY, category_id, 5.0)
            },
            &connection,
        )
        .unwrap();
        let split_id = create_transaction(
            NewTransaction {
                transaction_type: TransactionType::ExpenseSplit,
                number: "SPL-1".to_owned(),
                paid_at: date!(2024 - 01 - 02),
                ..NewTransaction::expense(COMPANY, category_id, 5.0)
            },
            &connection,
        )
        .unwrap();
        let from_recurring = create_transaction(
            NewTransaction {
                number: "TRA-1".to_owned(),
                paid_at: date!(2024 - 02 - 01),
                parent_id: Some(recurring_id),
                ..NewTransaction::expense(COMPANY, category_id, 5.0)
            },
            &connection,
        )
        .unwrap();
        let from_split = create_transaction(
            NewTransaction {
                number: "TRA-2".to_owned(),
                paid_at: date!(2024 - 02 - 02),
                parent_id: Some(split_id),
                ..NewTransaction::expense(COMPANY, category_id, 5.0)
            },
            &connection,
        )
        .unwrap();

        let lines = export(
            &TransactionsExport {
                company_id: COMPANY,
                ids: Some(vec![from_recurring, from_split]),
            },
            &connection,
        );

        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("expense,TRA-2,"));
        assert!(lines[1].ends_with(",0,"));
        assert!(lines[2].starts_with("expense,TRA-1,"));
        assert!(lines[2].ends_with(",0,REC-1"));
    }

    #[test]
    fn other_companies_are_not_exported() {
        let (connection, category_id) = get_test_connection();
        create_transaction(
            NewTransaction::expense(COMPANY + 1, category_id, 1.0),
            &connection,
        )
        .unwrap();

        let lines = export(
            &TransactionsExport {
                company_id: COMPANY,
                ids: None,
            },
            &connection,
        );

        assert_eq!(lines.len(), 1);
    }
}
