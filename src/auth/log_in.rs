//! The log-in page and the handler for log-in requests.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Duration;

use crate::{
    AppState, Error,
    auth::{
        cookie::{invalidate_auth_cookie, set_auth_cookie},
        user::get_user_by_email,
    },
    endpoints,
    html::base,
};

/// How long the auth cookie should last if the user selects "remember me".
const REMEMBER_ME_COOKIE_DURATION: Duration = Duration::days(7);

pub(crate) const INVALID_CREDENTIALS_ERROR_MSG: &str = "Incorrect email or password.";

fn log_in_form(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::LOG_IN_API)
            hx-target="this"
            hx-swap="outerHTML"
            class="form-stack"
        {
            @if let Some(error_message) = error_message {
                p class="form-error" { (error_message) }
            }

            div class="form-field"
            {
                label for="email" { "Email" }
                input type="email" name="email" id="email" value=(email) required;
            }

            div class="form-field"
            {
                label for="password" { "Password" }
                input type="password" name="password" id="password" required;
            }

            div class="form-field form-field-inline"
            {
                input type="checkbox" name="remember_me" id="remember_me";
                label for="remember_me" { "Keep me logged in for one week" }
            }

            button type="submit" class="btn btn-primary" { "Log in" }

            p class="form-footnote"
            {
                "Don't have an account? "
                a href=(endpoints::REGISTER_VIEW) { "Register here" }
            }
        }
    }
}

/// Display the log-in page.
pub async fn get_log_in_page() -> Markup {
    let content = html! {
        section class="card card-narrow"
        {
            h1 { "Log in to Expenseur" }
            (log_in_form("", None))
        }
    };

    base("Log In", &content)
}

/// The state needed to perform a log-in.
#[derive(Clone)]
pub struct LoginState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for looking up the user.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for LoginState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<LoginState> for Key {
    fn from_ref(state: &LoginState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the log-in form.
#[derive(Clone, Deserialize)]
pub struct LogInData {
    /// The email address entered during log-in.
    pub email: String,

    /// The password entered during log-in. No validation is needed here:
    /// it is only compared against the stored hash.
    pub password: String,

    /// Whether to extend the initial auth cookie duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or
    /// is not set. `Some` means checked, whatever the string is.
    pub remember_me: Option<String>,
}

/// Handler for log-in requests via the POST method.
///
/// On success the auth cookie is set and the client is redirected to the
/// calendar page. Otherwise the form is returned with an error message.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn post_log_in(
    State(state): State<LoginState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<LogInData>,
) -> Response {
    let user = match get_user_by_email(user_data.email.trim(), &state.db_connection.lock().unwrap())
    {
        Ok(user) => user,
        Err(Error::NotFound) => {
            return log_in_form(&user_data.email, Some(INVALID_CREDENTIALS_ERROR_MSG))
                .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while looking up the user: {error}");
            return log_in_form(
                &user_data.email,
                Some("An internal error occurred. Please try again later."),
            )
            .into_response();
        }
    };

    let is_password_valid = match user.password_hash.verify(&user_data.password) {
        Ok(is_password_valid) => is_password_valid,
        Err(error) => {
            tracing::error!("Unhandled error while verifying credentials: {error}");
            return log_in_form(
                &user_data.email,
                Some("An internal error occurred. Please try again later."),
            )
            .into_response();
        }
    };

    if !is_password_valid {
        return log_in_form(&user_data.email, Some(INVALID_CREDENTIALS_ERROR_MSG)).into_response();
    }

    let cookie_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_COOKIE_DURATION
    } else {
        state.cookie_duration
    };

    match set_auth_cookie(jar.clone(), user.id, cookie_duration) {
        Ok(updated_jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::CALENDAR_VIEW.to_owned()),
            updated_jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_auth_cookie(jar),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod log_in_page_tests {
    use axum::http::{StatusCode, header::CONTENT_TYPE};
    use axum::response::IntoResponse;

    use crate::test_utils::{assert_valid_html, parse_html_document};

    use super::get_log_in_page;

    #[tokio::test]
    async fn log_in_page_renders_the_form() {
        let response = get_log_in_page().await.into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
    }
}
