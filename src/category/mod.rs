//! Categories group transactions, items and documents for reporting.
//!
//! Categories form a tree per company and type. Deleting a category deletes
//! its sub-categories first, see [DeleteCategory].

pub(crate) mod db;
mod delete;
mod delete_endpoint;
mod domain;
mod store;

pub use db::{create_category, create_category_table, get_category};
pub use delete::{DeleteCategory, DeletionError, DeletionReport, DeletionWarning, WarningSummary};
pub use delete_endpoint::{DeleteCategoryEndpointState, delete_category_endpoint};
pub use domain::{Category, CategoryId, CategoryName, CategoryType, NewCategory};
pub use store::{CategoryStore, SQLiteCategoryStore};
