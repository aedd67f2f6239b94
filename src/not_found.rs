//! The 404 page.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{endpoints, html::base};

/// The page returned when the requested resource does not exist.
pub struct NotFoundPage;

impl IntoResponse for NotFoundPage {
    fn into_response(self) -> Response {
        let content = html! {
            section class="card card-narrow"
            {
                h1 { "404 - Not Found" }
                p { "The page you were looking for does not exist." }
                a href=(endpoints::CALENDAR_VIEW) { "Back to the calendar" }
            }
        };

        (StatusCode::NOT_FOUND, base("Not Found", &content)).into_response()
    }
}

/// The fallback route handler for unknown paths.
pub async fn get_404_not_found() -> Response {
    NotFoundPage.into_response()
}
