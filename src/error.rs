//! Defines the app level error type and conversions to rendered HTML pages and alerts.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::{alert::Alert, internal_server_error::InternalServerError, not_found::NotFoundPage};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The expense store could not be read, either because the backing
    /// service failed or because there is no authenticated user.
    ///
    /// Readers should degrade to an empty collection and the default
    /// category set instead of propagating this error to the client.
    #[error("the expense store is unavailable: {0}")]
    StoreUnavailable(String),

    /// A write to the expense store was rejected or errored.
    ///
    /// Callers must leave in-memory state untouched when they receive this
    /// error. It is logged, not shown as a blocking error to the client.
    #[error("the write to the expense store failed: {0}")]
    WriteFailed(String),

    /// The amount given for an expense was not a finite, non-negative number.
    ///
    /// The operation that received the amount is skipped without touching
    /// the store or in-memory state.
    #[error("{0} is not a valid expense amount, expected a finite, non-negative number")]
    InvalidAmount(f64),

    /// A string that is not a `YYYY-MM-DD` date key was used where a date
    /// key was expected.
    #[error("could not parse \"{0}\" as a date key, expected YYYY-MM-DD")]
    InvalidDateKey(String),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows or a
    /// delete affects none.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The user provided an invalid email and password combination.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// The string used to register a user was not an email address.
    #[error("\"{0}\" is not a valid email address")]
    InvalidEmail(String),

    /// The email address used to register already belongs to a user.
    #[error("the email address is already registered")]
    DuplicateEmail,

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// An unexpected error occurred in the underlying hashing library.
    ///
    /// The error string should only be logged on the server, never sent to
    /// the client.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// The auth or expiry cookie is missing from the cookie jar.
    #[error("the auth cookie is missing from the cookie jar")]
    CookieMissing,

    /// The expiry date time in the auth cookie could not be parsed or
    /// formatted.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not handle the expiry cookie date-time \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// An error occurred while resolving a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezone(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => Error::SqlError(error),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::InvalidDateKey(_) => NotFoundPage.into_response(),
            Error::InvalidTimezone(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert fragment.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = match self {
            Error::WriteFailed(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Could not save your changes",
                    "The expense store rejected the write. \
                    Try again later or check the logs on the server.",
                ),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not find the expense",
                    "Try refreshing the page to see if it has already been deleted.",
                ),
            ),
            Error::InvalidAmount(amount) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid amount",
                    &format!("{amount} is not a valid amount. Enter a non-negative number."),
                ),
            ),
            Error::InvalidDateKey(date_key) => (
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid date",
                    &format!("\"{date_key}\" is not a valid date, expected YYYY-MM-DD."),
                ),
            ),
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Alert::error(
                        "Something went wrong",
                        "An unexpected error occurred, check the server logs for more details.",
                    ),
                )
            }
        };

        (status_code, alert.into_html()).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use super::Error;

    #[test]
    fn sql_no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn unhandled_sql_error_is_wrapped() {
        let error: Error = rusqlite::Error::InvalidQuery.into();

        assert_eq!(error, Error::SqlError(rusqlite::Error::InvalidQuery));
    }
}
