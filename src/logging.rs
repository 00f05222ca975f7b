//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{Method, StatusCode, Uri},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// The number of bytes of a body that are logged before it is truncated.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// The method, URI and response status are logged at the `info` level.
/// Bodies are logged at the `debug` level, truncated to
/// [LOG_BODY_LENGTH_LIMIT] bytes.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let (parts, body) = request.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("Could not read request body for {method} {uri}: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };
    log_request(&method, &uri, &body_text);

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match body_to_text(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("Could not read response body for {method} {uri}: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&method, &uri, parts.status, &body_text);

    Response::from_parts(parts, body_text.into())
}

async fn body_to_text(body: Body) -> Result<String, axum::Error> {
    let body_bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&body_bytes).to_string())
}

/// Cut `body` to at most [LOG_BODY_LENGTH_LIMIT] bytes on a character boundary.
fn truncate(body: &str) -> &str {
    if body.len() <= LOG_BODY_LENGTH_LIMIT {
        return body;
    }

    let mut end = LOG_BODY_LENGTH_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

fn log_request(method: &Method, uri: &Uri, body: &str) {
    tracing::info!("Received request: {method} {uri}");

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("request body: {}...", truncate(body));
    } else if !body.is_empty() {
        tracing::debug!("request body: {body:?}");
    }
}

fn log_response(method: &Method, uri: &Uri, status: StatusCode, body: &str) {
    tracing::info!("Sending response: {method} {uri} {status}");

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::debug!("response body: {}...", truncate(body));
    } else {
        tracing::debug!("response body: {body:?}");
    }
}

#[cfg(test)]
mod logging_tests {
    use super::{LOG_BODY_LENGTH_LIMIT, truncate};

    #[test]
    fn short_body_is_not_truncated() {
        assert_eq!(truncate("hello"), "hello");
    }

    #[test]
    fn long_body_is_truncated_to_limit() {
        let body = "a".repeat(LOG_BODY_LENGTH_LIMIT * 2);

        assert_eq!(truncate(&body).len(), LOG_BODY_LENGTH_LIMIT);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // Each 'é' is two bytes, so the limit falls inside a character when
        // preceded by one ASCII byte.
        let body = format!("a{}", "é".repeat(LOG_BODY_LENGTH_LIMIT));

        let truncated = truncate(&body);

        assert!(truncated.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(body.starts_with(truncated));
    }
}
