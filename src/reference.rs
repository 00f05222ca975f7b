//! The kinds of records that can point at a category.
//!
//! Each kind is declared here together with the query that counts its
//! records for a category, so adding a new referencing entity means adding a
//! variant rather than discovering relations at runtime.

use serde::Serialize;

/// A kind of record that references a category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// Products and services.
    Items,
    /// Sales documents.
    Invoices,
    /// Purchase documents.
    Bills,
    /// Banking transactions.
    Transactions,
}

impl ReferenceKind {
    /// Every kind, in the order they are reported to the user.
    pub const ALL: &'static [ReferenceKind] = &[
        ReferenceKind::Items,
        ReferenceKind::Invoices,
        ReferenceKind::Bills,
        ReferenceKind::Transactions,
    ];

    /// The name shown to users when this kind blocks a deletion.
    pub fn label(&self) -> &'static str {
        match self {
            ReferenceKind::Items => "items",
            ReferenceKind::Invoices => "invoices",
            ReferenceKind::Bills => "bills",
            ReferenceKind::Transactions => "transactions",
        }
    }

    /// SQL that counts the records of this kind for one category.
    ///
    /// Takes `:company_id` and `:category_id` as named parameters.
    pub(crate) fn count_query(&self) -> &'static str {
        match self {
            ReferenceKind::Items => {
                "SELECT COUNT(id) FROM item \
                WHERE company_id = :company_id AND category_id = :category_id;"
            }
            ReferenceKind::Invoices => {
                "SELECT COUNT(id) FROM document \
                WHERE company_id = :company_id AND category_id = :category_id AND type = 'invoice';"
            }
            ReferenceKind::Bills => {
                "SELECT COUNT(id) FROM document \
                WHERE company_id = :company_id AND category_id = :category_id AND type = 'bill';"
            }
            ReferenceKind::Transactions => {
                "SELECT COUNT(id) FROM \"transaction\" \
                WHERE company_id = :company_id AND category_id = :category_id;"
            }
        }
    }
}

#[cfg(test)]
mod reference_kind_tests {
    use rusqlite::Connection;

    use crate::db::initialize;

    use super::ReferenceKind;

    #[test]
    fn count_queries_are_valid_sql() {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        for kind in ReferenceKind::ALL {
            let count: i64 = connection
                .query_row(
                    kind.count_query(),
                    rusqlite::named_params! { ":company_id": 1, ":category_id": 1 },
                    |row| row.get(0),
                )
                .unwrap_or_else(|error| panic!("query for {kind:?} failed: {error}"));

            assert_eq!(count, 0);
        }
    }

    #[test]
    fn labels_follow_declaration_order() {
        let labels: Vec<&str> = ReferenceKind::ALL.iter().map(|kind| kind.label()).collect();

        assert_eq!(labels, vec!["items", "invoices", "bills", "transactions"]);
    }
}
