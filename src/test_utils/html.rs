use axum::{body::Body, response::Response};
use scraper::Html;

use super::response_text;

pub(crate) async fn parse_html_fragment(response: Response<Body>) -> Html {
    let text = response_text(response).await;

    Html::parse_fragment(&text)
}

#[track_caller]
pub(crate) fn assert_valid_html(html: &Html) {
    assert!(
        html.errors.is_empty(),
        "Got HTML parsing errors: {:?}",
        html.errors
    );
}
