//! Alert system for displaying success and error messages to users.
//!
//! Alerts are HTML fragments that the front end swaps into the alert
//! container. Deleting a category may succeed while some of its
//! sub-categories are kept, so an alert can also carry a list of warnings.

use axum::response::{Html, IntoResponse, Response};
use maud::{Markup, html};

const SUCCESS_STYLE: &str = "p-4 mb-4 text-sm text-green-800 rounded bg-green-50 \
    dark:bg-gray-800 dark:text-green-400";
const ERROR_STYLE: &str = "p-4 mb-4 text-sm text-red-800 rounded bg-red-50 \
    dark:bg-gray-800 dark:text-red-400";
const WARNING_LIST_STYLE: &str = "mt-2 list-disc list-inside text-yellow-800 dark:text-yellow-300";

/// A message shown to the user after an action completes.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The action succeeded.
    Success {
        /// The headline.
        message: String,
        /// Extra detail shown under the headline.
        details: String,
    },
    /// The action succeeded and there is nothing more to say.
    SuccessSimple {
        /// The headline.
        message: String,
    },
    /// The action succeeded, but parts of it were skipped.
    SuccessWithWarnings {
        /// The headline.
        message: String,
        /// One entry per skipped part.
        warnings: Vec<String>,
    },
    /// The action failed.
    Error {
        /// The headline.
        message: String,
        /// What went wrong and how to fix it.
        details: String,
    },
    /// The action failed, and parts of it were skipped before it did.
    ErrorWithWarnings {
        /// The headline.
        message: String,
        /// What went wrong and how to fix it.
        details: String,
        /// One entry per skipped part.
        warnings: Vec<String>,
    },
}

impl Alert {
    /// Render the alert as an HTML fragment.
    pub fn into_html(self) -> Markup {
        match self {
            Alert::Success { message, details } => alert_view(SUCCESS_STYLE, &message, &details, &[]),
            Alert::SuccessSimple { message } => alert_view(SUCCESS_STYLE, &message, "", &[]),
            Alert::SuccessWithWarnings { message, warnings } => {
                alert_view(SUCCESS_STYLE, &message, "", &warnings)
            }
            Alert::Error { message, details } => alert_view(ERROR_STYLE, &message, &details, &[]),
            Alert::ErrorWithWarnings {
                message,
                details,
                warnings,
            } => alert_view(ERROR_STYLE, &message, &details, &warnings),
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        Html(self.into_html().into_string()).into_response()
    }
}

fn alert_view(style: &str, message: &str, details: &str, warnings: &[String]) -> Markup {
    html! {
        div class=(style) role="alert"
        {
            p class="font-medium" { (message) }

            @if !details.is_empty() {
                span { (details) }
            }

            @if !warnings.is_empty() {
                ul class=(WARNING_LIST_STYLE)
                {
                    @for warning in warnings {
                        li { (warning) }
                    }
                }
            }
        }
    }
}
