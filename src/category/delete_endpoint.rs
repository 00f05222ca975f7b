//! Category deletion endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{
    AppState, CompanyId, Error,
    alert::Alert,
    category::{CategoryId, DeleteCategory, DeletionError, SQLiteCategoryStore},
    events::BroadcastEventBus,
    settings::SQLiteSettings,
    translation::{Translations, Translator},
};

/// The state needed for deleting a category.
#[derive(Debug, Clone)]
pub struct DeleteCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
    pub event_bus: BroadcastEventBus,
    pub translations: Translations,
}

impl FromRef<AppState> for DeleteCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            event_bus: state.event_bus.clone(),
            translations: state.translations.clone(),
        }
    }
}

/// Handle category deletion.
///
/// Responds with a success alert listing the sub-categories that were kept,
/// or an error alert explaining why the category was kept.
pub async fn delete_category_endpoint(
    Path((company_id, category_id)): Path<(CompanyId, CategoryId)>,
    State(state): State<DeleteCategoryEndpointState>,
) -> Response {
    let success_message = state
        .translations
        .message("messages.success.deleted", &[("type", "Category")]);

    let workflow = DeleteCategory::new(
        SQLiteCategoryStore::new(state.db_connection.clone()),
        SQLiteSettings::new(state.db_connection.clone()),
        state.event_bus,
        state.translations,
    );

    let report = workflow.delete(company_id, category_id);
    let deleted_count = report.deleted_count();

    match report.into_result() {
        Ok(warnings) => {
            let warnings: Vec<String> = warnings.iter().map(|warning| warning.message()).collect();

            if !warnings.is_empty() {
                Alert::SuccessWithWarnings {
                    message: success_message,
                    warnings,
                }
                .into_response()
            } else if deleted_count > 1 {
                Alert::Success {
                    message: success_message,
                    details: format!("Deleted {deleted_count} categories."),
                }
                .into_response()
            } else {
                Alert::SuccessSimple {
                    message: success_message,
                }
                .into_response()
            }
        }
        Err((DeletionError::Store(error), _)) => match error {
            Error::NotFound => Error::NotFound.into_alert_response(),
            Error::DeleteMissingCategory => Error::DeleteMissingCategory.into_alert_response(),
            error => {
                tracing::error!(
                    "An unexpected error occurred while deleting category {category_id}: {error}"
                );
                error.into_alert_response()
            }
        },
        Err((error, warnings)) => {
            let message = "Could not delete category".to_owned();
            let details = error.to_string();
            let warnings: Vec<String> = warnings.iter().map(|warning| warning.message()).collect();

            let alert = if warnings.is_empty() {
                Alert::Error { message, details }
            } else {
                Alert::ErrorWithWarnings {
                    message,
                    details,
                    warnings,
                }
            };

            (StatusCode::BAD_REQUEST, alert).into_response()
        }
    }
}
