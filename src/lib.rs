//! Bookkeeper is the application layer of a multi-tenant bookkeeping web app.
//!
//! The core of this library is the category deletion workflow
//! ([DeleteCategory]), which removes a tree of categories bottom-up while
//! refusing to delete categories that other records still depend on.
//! Around it sit a SQLite store, per-company settings, lifecycle events, CSV
//! exports and a thin HTTP layer that reports the outcome to the user.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod company;
mod db;
mod document;
mod endpoints;
mod events;
mod export;
mod item;
mod logging;
mod reference;
mod routing;
mod settings;
mod transaction;
mod translation;

#[cfg(test)]
mod test_utils;

pub use alert::Alert;
pub use app_state::AppState;
pub use category::{
    Category, CategoryId, CategoryName, CategoryStore, CategoryType, DeleteCategory,
    DeletionError, DeletionReport, DeletionWarning, NewCategory, SQLiteCategoryStore,
    WarningSummary, create_category, get_category,
};
pub use company::CompanyId;
pub use db::initialize as initialize_db;
pub use document::{DocumentType, NewDocument, create_document};
pub use events::{BroadcastEventBus, CategoryEvent, EventBus};
pub use export::{Cell, Export, ItemsExport, TransactionsExport, write_csv};
pub use item::{NewItem, create_item};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use reference::ReferenceKind;
pub use routing::build_router;
pub use settings::{DefaultCategory, SQLiteSettings, Settings, get_setting, set_setting};
pub use transaction::{NewTransaction, TransactionType, create_transaction};
pub use translation::{Translations, Translator};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A string could not be parsed as a category type.
    #[error("\"{0}\" is not a valid category type")]
    InvalidCategoryType(String),

    /// The parent ID used to create a category did not match a category of
    /// the same company and type.
    #[error("the parent ID does not refer to a valid parent category")]
    InvalidParentCategory(Option<CategoryId>),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Tried to delete a category that does not exist
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The export could not be written as CSV.
    #[error("could not write the export: {0}")]
    ExportError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::ExportError(value.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        self.into_alert_response()
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Not found".to_owned(),
                    details: "The requested resource could not be found. \
                        Check that the ID is correct and try again."
                        .to_owned(),
                },
            )
                .into_response(),
            Error::DeleteMissingCategory => (
                StatusCode::NOT_FOUND,
                Alert::Error {
                    message: "Could not delete category".to_owned(),
                    details: "The category could not be found. \
                        Try refreshing the page to see if the category has already been deleted."
                        .to_owned(),
                },
            )
                .into_response(),
            Error::ExportError(error) => {
                tracing::error!("Export failed: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Export failed".to_owned(),
                        details: "The export could not be created, check the server logs for more details."
                            .to_owned(),
                    },
                )
                    .into_response()
            }
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::Error {
                        message: "Something went wrong".to_owned(),
                        details: "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                    },
                )
                    .into_response()
            }
        }
    }
}
