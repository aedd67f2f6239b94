//! The page to display when an internal server error occurs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::html::base;

/// The internal server error page, with a description of what failed and a
/// suggestion for how to fix it.
pub struct InternalServerError<'a> {
    /// A short description of what went wrong.
    pub description: &'a str,
    /// What the user can do about it.
    pub fix: &'a str,
}

impl Default for InternalServerError<'_> {
    fn default() -> Self {
        Self {
            description: "Something went wrong",
            fix: "An unexpected error occurred. Try again later or check the logs on the server.",
        }
    }
}

impl IntoResponse for InternalServerError<'_> {
    fn into_response(self) -> Response {
        let content = html! {
            section class="card card-narrow"
            {
                h1 { "500 - " (self.description) }
                p { (self.fix) }
            }
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            base("Internal Server Error", &content),
        )
            .into_response()
    }
}

/// The route handler for the generic error page clients are redirected to.
pub async fn get_internal_server_error_page() -> Response {
    InternalServerError::default().into_response()
}
