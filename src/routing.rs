//! Application router configuration.

use axum::{
    Router, middleware,
    routing::{delete, get},
};

use crate::{
    AppState,
    category::delete_category_endpoint,
    endpoints,
    export::{export_items_endpoint, export_transactions_endpoint},
    logging::logging_middleware,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::DELETE_CATEGORY, delete(delete_category_endpoint))
        .route(
            endpoints::TRANSACTIONS_EXPORT,
            get(export_transactions_endpoint),
        )
        .route(endpoints::ITEMS_EXPORT, get(export_items_endpoint))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(state)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        AppState,
        endpoints::{self, format_endpoint},
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap())
            .expect("Could not create app state");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn delete_missing_category_is_routed() {
        let server = get_test_server();

        let response = server
            .delete(&format_endpoint(endpoints::DELETE_CATEGORY, &[1, 1]))
            .await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn export_is_routed() {
        let server = get_test_server();

        let response = server
            .get(&format_endpoint(endpoints::ITEMS_EXPORT, &[1]))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.header("content-type"), "text/csv; charset=utf-8");
    }
}
