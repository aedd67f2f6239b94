//! The registration page and the handler for creating a new user.

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
    auth::{Email, PasswordHash, ValidatedPassword, cookie::set_auth_cookie, user::create_user},
    endpoints,
    html::base,
};

fn register_form(email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS_API)
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

            div class="form-field"
            {
                label for="confirm_password" { "Confirm password" }
                input type="password" name="confirm_password" id="confirm_password" required;
            }

            button type="submit" class="btn btn-primary" { "Register" }

            p class="form-footnote"
            {
                "Already have an account? "
                a href=(endpoints::LOG_IN_VIEW) { "Log in here" }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Markup {
    let content = html! {
        section class="card card-narrow"
        {
            h1 { "Create your account" }
            (register_form("", None))
        }
    };

    base("Register", &content)
}

/// The state needed to register a user.
#[derive(Clone)]
pub struct RegisterState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which cookies used for authentication are valid.
    pub cookie_duration: Duration,
    /// The database connection for creating the user.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for RegisterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            db_connection: state.db_connection.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<RegisterState> for Key {
    fn from_ref(state: &RegisterState) -> Self {
        state.cookie_key.clone()
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Clone, Deserialize)]
pub struct RegisterData {
    /// The email address to register with.
    pub email: String,
    /// The chosen password.
    pub password: String,
    /// The password typed a second time.
    pub confirm_password: String,
}

/// Handler for registering a new user via the POST method.
///
/// On success the user is created, signed in, and redirected to the
/// calendar page. Otherwise the form is returned with an error message.
///
/// # Panics
///
/// Panics if the lock for the database connection is already held by the
/// same thread.
pub async fn create_user_endpoint(
    State(state): State<RegisterState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<RegisterData>,
) -> Response {
    let email = match Email::new(&user_data.email) {
        Ok(email) => email,
        Err(_) => {
            return register_form(&user_data.email, Some("Enter a valid email address."))
                .into_response();
        }
    };

    if user_data.password != user_data.confirm_password {
        return register_form(&user_data.email, Some("The passwords do not match."))
            .into_response();
    }

    let password_hash = match ValidatedPassword::new(&user_data.password)
        .and_then(|password| PasswordHash::new(password, PasswordHash::DEFAULT_COST))
    {
        Ok(password_hash) => password_hash,
        Err(Error::TooWeak(feedback)) => {
            return register_form(
                &user_data.email,
                Some(&format!("Password is too weak: {feedback}")),
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while hashing a password: {error}");
            return register_form(
                &user_data.email,
                Some("An internal error occurred. Please try again later."),
            )
            .into_response();
        }
    };

    let user = match create_user(email, password_hash, &state.db_connection.lock().unwrap()) {
        Ok(user) => user,
        Err(Error::DuplicateEmail) => {
            return register_form(
                &user_data.email,
                Some("That email address is already registered. Log in instead."),
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while creating a user: {error}");
            return register_form(
                &user_data.email,
                Some("An internal error occurred. Please try again later."),
            )
            .into_response();
        }
    };

    match set_auth_cookie(jar, user.id, state.cookie_duration) {
        Ok(updated_jar) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::CALENDAR_VIEW.to_owned()),
            updated_jar,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Error setting auth cookie after registration: {error}");
            (
                HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
    }
}
