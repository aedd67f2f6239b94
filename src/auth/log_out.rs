//! The log-out route.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::PrivateCookieJar;

use crate::{AppState, auth::cookie::invalidate_auth_cookie, endpoints};

/// Sign the current user out: discard the in-memory session contents,
/// delete the auth cookies, and redirect to the log-in page.
pub async fn get_log_out(State(state): State<AppState>, jar: PrivateCookieJar) -> Response {
    state.session.sign_out();

    (
        invalidate_auth_cookie(jar),
        Redirect::to(endpoints::LOG_IN_VIEW),
    )
        .into_response()
}
