//! CSV download endpoints.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, CompanyId, Error,
    export::{Export, ItemsExport, TransactionsExport, write_csv},
};

/// The state needed for exporting records.
#[derive(Debug, Clone)]
pub struct ExportState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ExportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Download every transaction of a company as CSV.
pub async fn export_transactions_endpoint(
    Path(company_id): Path<CompanyId>,
    State(state): State<ExportState>,
) -> Response {
    csv_response(
        &TransactionsExport {
            company_id,
            ids: None,
        },
        &state,
    )
}

/// Download every item of a company as CSV.
pub async fn export_items_endpoint(
    Path(company_id): Path<CompanyId>,
    State(state): State<ExportState>,
) -> Response {
    csv_response(
        &ItemsExport {
            company_id,
            ids: None,
        },
        &state,
    )
}

fn csv_response<E: Export>(export: &E, state: &ExportState) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let mut buffer = Vec::new();

    match write_csv(export, &connection, &mut buffer) {
        Ok(rows) => {
            tracing::info!("exported {rows} rows of {}", export.title());

            (
                [
                    (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
                    (
                        CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{}.csv\"", export.title()),
                    ),
                ],
                buffer,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("could not export {}: {error}", export.title());
            Error::ExportError(error.to_string()).into_alert_response()
        }
    }
}
